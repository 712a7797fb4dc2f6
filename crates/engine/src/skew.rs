//! Per-symbol rolling skew statistics.

use std::collections::VecDeque;

use dashmap::DashMap;
use vega_core::Symbol;

/// Bounded history length per symbol
pub const SKEW_WINDOW: usize = 20;
/// Standard-deviation floor used during warm-up (< 2 samples) to avoid an
/// undefined z-score and suppress false triggers on the first few events
const SIGMA_FLOOR: f64 = 0.1;

/// One symbol's bounded FIFO of past skew readings
#[derive(Debug, Default)]
struct SkewWindow {
    values: VecDeque<f64>,
}

impl SkewWindow {
    /// Append a reading (evicting the oldest at capacity) and return the
    /// z-score of the reading against the updated window.
    fn observe(&mut self, skew: f64) -> f64 {
        if self.values.len() >= SKEW_WINDOW {
            self.values.pop_front();
        }
        self.values.push_back(skew);

        let n = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / n;

        let sigma = if self.values.len() < 2 {
            SIGMA_FLOOR
        } else {
            let variance = self
                .values
                .iter()
                .map(|v| {
                    let d = v - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            variance.sqrt()
        };

        if sigma == 0.0 {
            0.0
        } else {
            (skew - mean) / sigma
        }
    }
}

/// Rolling skew tracker for all watched symbols.
///
/// One bounded window per symbol, created lazily on first use. The map's
/// per-key entry guard makes append-then-read a single atomic unit per
/// symbol while evaluations for different symbols proceed in parallel.
#[derive(Debug, Default)]
pub struct SkewTracker {
    windows: DashMap<Symbol, SkewWindow>,
}

impl SkewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current skew reading for a symbol and return its
    /// z-score (the skew jump) against the symbol's rolling window.
    pub fn observe(&self, symbol: &str, skew: f64) -> f64 {
        self.windows
            .entry(symbol.to_string())
            .or_default()
            .observe(skew)
    }

    /// Number of readings currently held for a symbol
    pub fn history_len(&self, symbol: &str) -> usize {
        self.windows
            .get(symbol)
            .map(|w| w.values.len())
            .unwrap_or(0)
    }
}
