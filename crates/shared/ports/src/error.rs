use thiserror::Error;

/// Failures surfaced by the externally-sourced data ports.
///
/// None of these are fatal to an evaluation: the engine degrades the
/// affected signal to its documented neutral default and continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error("Lookup timed out")]
    Timeout,

    #[error("Data unavailable: {0}")]
    Unavailable(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

pub type DataResult<T> = std::result::Result<T, MarketDataError>;
