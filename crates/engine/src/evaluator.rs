//! Per-alert evaluation pipeline.
//!
//! Wires the ports, the strike window selector, the aggregator, the
//! rolling skew tracker and the classifier into the one-shot decision
//! procedure each inbound alert runs through.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info};
use thiserror::Error;
use tokio::time::timeout;
use vega_core::{Price, SignalBundle, Symbol, Verdict};
use vega_ports::{BaselineReader, Clock, InstrumentResolver, MarketData, MarketDataError};

use crate::aggregator::SignalAggregator;
use crate::classifier::classify;
use crate::config::EngineConfig;
use crate::skew::SkewTracker;
use crate::window::StrikeWindow;

/// The one failure an evaluation can surface: the underlying's spot price
/// could not be obtained. Everything downstream degrades instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluateError {
    #[error("spot lookup failed: {0}")]
    Spot(#[from] MarketDataError),
}

pub type EvaluateResult<T> = std::result::Result<T, EvaluateError>;

/// Outcome of evaluating one alert
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The resolved expiry has no strikes. Informational, non-alerting;
    /// the consumer should not treat this as a trading signal.
    NoOptionChain,
    /// The full pipeline ran
    Classified {
        spot: Price,
        bundle: SignalBundle,
        verdict: Verdict,
    },
}

/// The decision engine's entry point for one symbol's alert.
///
/// Holds the process-lifetime skew tracker; everything else is taken
/// per evaluation. Evaluations for different symbols run concurrently
/// without blocking each other.
pub struct Evaluator {
    market: Arc<dyn MarketData>,
    resolver: Arc<dyn InstrumentResolver>,
    clock: Arc<dyn Clock>,
    skew: SkewTracker,
    aggregator: SignalAggregator,
    config: EngineConfig,
}

impl Evaluator {
    pub fn new(
        market: Arc<dyn MarketData>,
        resolver: Arc<dyn InstrumentResolver>,
        baseline: Arc<dyn BaselineReader>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        let aggregator = SignalAggregator::new(
            Arc::clone(&market),
            Arc::clone(&resolver),
            baseline,
            config.clone(),
        );
        Self {
            market,
            resolver,
            clock,
            skew: SkewTracker::new(),
            aggregator,
            config,
        }
    }

    /// Run the full decision procedure for one alert.
    pub async fn evaluate(&self, symbol: &Symbol) -> EvaluateResult<Evaluation> {
        let now = self.clock.now();

        let spot = match timeout(self.config.data_timeout(), self.market.spot(symbol)).await {
            Ok(result) => result?,
            Err(_) => return Err(EvaluateError::Spot(MarketDataError::Timeout)),
        };

        let Some(expiry) = self.resolve_expiry(symbol).await else {
            info!("[Evaluator] {symbol}: no resolvable expiry, no option chain");
            return Ok(Evaluation::NoOptionChain);
        };

        let strikes = self.strikes(symbol, expiry).await;
        let Some(window) = StrikeWindow::select(spot, &strikes, self.config.window_radius) else {
            info!("[Evaluator] {symbol}: no strikes for {expiry}, no option chain");
            return Ok(Evaluation::NoOptionChain);
        };

        let mut bundle = self
            .aggregator
            .aggregate(symbol, expiry, &window, spot, now)
            .await;
        bundle.skew_jump = self.skew.observe(symbol, bundle.skew);

        let verdict = classify(&bundle, &self.config.thresholds);
        info!(
            "[Evaluator] {symbol}: dce={} dpe={} doi_put={} vol_ratio={:.2} skew={:.2} jump={:.2} -> {} ({})",
            bundle.dce,
            bundle.dpe,
            bundle.doi_put,
            bundle.call_vol_ratio,
            bundle.skew,
            bundle.skew_jump,
            verdict.trend,
            verdict.flags_label(),
        );

        Ok(Evaluation::Classified {
            spot,
            bundle,
            verdict,
        })
    }

    async fn resolve_expiry(&self, symbol: &Symbol) -> Option<NaiveDate> {
        match timeout(self.config.data_timeout(), self.resolver.resolve_expiry(symbol)).await {
            Ok(Ok(expiry)) => Some(expiry),
            Ok(Err(e)) => {
                debug!("[Evaluator] {symbol}: expiry resolution failed: {e}");
                None
            }
            Err(_) => {
                debug!("[Evaluator] {symbol}: expiry resolution timed out");
                None
            }
        }
    }

    async fn strikes(&self, symbol: &Symbol, expiry: NaiveDate) -> Vec<Price> {
        match timeout(
            self.config.data_timeout(),
            self.resolver.strikes(symbol, expiry),
        )
        .await
        {
            Ok(Ok(strikes)) => strikes,
            Ok(Err(e)) => {
                debug!("[Evaluator] {symbol}: strike listing failed: {e}");
                Vec::new()
            }
            Err(_) => {
                debug!("[Evaluator] {symbol}: strike listing timed out");
                Vec::new()
            }
        }
    }
}
