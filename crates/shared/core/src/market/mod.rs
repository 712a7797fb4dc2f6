//! Market data primitives consumed by the decision engine.

use serde::{Deserialize, Serialize};

use crate::values::Price;

/// Option leg kind: Call (CE) or Put (PE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Sign convention for the Black-Scholes closed form (+1 call, -1 put)
    pub fn sign(&self) -> f64 {
        match self {
            OptionKind::Call => 1.0,
            OptionKind::Put => -1.0,
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Call => write!(f, "CE"),
            OptionKind::Put => write!(f, "PE"),
        }
    }
}

/// Identifier of one tradable option instrument, as issued by the
/// instrument-metadata collaborator (e.g. "NIFTY24AUG22500CE").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstrumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time quote for one instrument. Ephemeral, fetched at
/// evaluation time and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Last traded price
    pub last_price: Price,
    /// Session-open price
    pub open_price: Price,
    /// Outstanding contract count
    pub open_interest: u64,
}

impl Quote {
    /// Premium move since session open
    pub fn premium_delta(&self) -> Price {
        self.last_price - self.open_price
    }
}

/// One fixed 5-minute OHLCV bucket since session start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: u64,
}

impl Candle {
    /// Bar closed above its open
    pub fn is_rising(&self) -> bool {
        self.close > self.open
    }

    /// Bar closed below its open
    pub fn is_falling(&self) -> bool {
        self.close < self.open
    }
}
