//! Vega Clock Infrastructure
//!
//! Time sources and the exchange session calendar:
//!
//! - [`SessionCalendar`]: exchange-local session-open instants and the
//!   next-fire computation the daily baseline capture job runs on
//! - [`SessionClock`]: wall-clock time bound to a session calendar, for
//!   production wiring
//! - [`FixedClock`]: controllable time for deterministic tests

mod fixed;
mod session;

pub use fixed::FixedClock;
pub use session::{SessionCalendar, SessionClock};

// Re-export the Clock trait for convenience
pub use vega_ports::Clock;
