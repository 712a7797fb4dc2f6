//! Vega Ports
//!
//! Port definitions (traits) for the Vega option-alert engine.
//! These define the boundaries between the decision core and its
//! collaborators (market data, instrument metadata, baseline store,
//! verdict delivery).

mod baseline;
mod clock;
mod error;
mod market_data;
mod resolver;
mod sink;

pub use baseline::{BaselineReader, BaselineSnapshot, BaselineStore};
pub use clock::Clock;
pub use error::{DataResult, MarketDataError};
pub use market_data::MarketData;
pub use resolver::InstrumentResolver;
pub use sink::VerdictSink;
