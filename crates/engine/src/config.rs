//! Engine configuration, immutable after process start.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vega_clock::SessionCalendar;
use vega_core::Thresholds;

use crate::window::DEFAULT_RADIUS;

/// Configuration shared read-only by all evaluations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display-window radius in strikes either side of ATM
    pub window_radius: usize,
    /// Bounded timeout per market-data call, milliseconds
    pub data_timeout_ms: u64,
    /// Annualized risk-free rate for Black-Scholes
    pub risk_free_rate: f64,
    /// Annualized dividend yield for Black-Scholes
    pub dividend_yield: f64,
    /// Classification thresholds
    pub thresholds: Thresholds,
    /// Exchange session calendar
    pub calendar: SessionCalendar,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_radius: DEFAULT_RADIUS,
            data_timeout_ms: 3_000,
            risk_free_rate: 0.07,
            dividend_yield: 0.0,
            thresholds: Thresholds::default(),
            calendar: SessionCalendar::default(),
        }
    }
}

impl EngineConfig {
    pub fn data_timeout(&self) -> Duration {
        Duration::from_millis(self.data_timeout_ms)
    }
}
