//! Vega Core Domain
//!
//! Pure domain types for the Vega option-alert engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod alert;
pub mod market;
pub mod signals;
pub mod values;

// Re-export commonly used types at crate root
pub use alert::AlertRecord;
pub use market::{Candle, InstrumentId, OptionKind, Quote};
pub use signals::{Flag, LegConfirmation, SignalBundle, Thresholds, Trend, Verdict};
pub use values::{Price, Quantity, Symbol, Timestamp};
