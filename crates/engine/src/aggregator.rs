//! Per-strike signal aggregation.
//!
//! Folds premium moves, volume behaviour and open-interest deltas across
//! the strike windows into one [`SignalBundle`]. Every market-data lookup
//! is wrapped in a bounded timeout and degrades to a documented neutral
//! value on failure - a missing leg never aborts an evaluation.

use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tokio::time::timeout;
use vega_core::{
    Candle, InstrumentId, LegConfirmation, OptionKind, Price, Quote, SignalBundle, Symbol,
    Timestamp,
};
use vega_ports::{BaselineReader, InstrumentResolver, MarketData};

use crate::config::EngineConfig;
use crate::iv::implied_vol;
use crate::window::StrikeWindow;

/// Number of trailing bars the volume ratio compares the latest bar to
const TRAILING_BARS: usize = 3;

/// Builds the signal bundle for one evaluation over the data ports.
pub struct SignalAggregator {
    market: Arc<dyn MarketData>,
    resolver: Arc<dyn InstrumentResolver>,
    baseline: Arc<dyn BaselineReader>,
    config: EngineConfig,
}

impl SignalAggregator {
    pub fn new(
        market: Arc<dyn MarketData>,
        resolver: Arc<dyn InstrumentResolver>,
        baseline: Arc<dyn BaselineReader>,
        config: EngineConfig,
    ) -> Self {
        Self {
            market,
            resolver,
            baseline,
            config,
        }
    }

    /// Aggregate all per-strike signals for one alert.
    ///
    /// `skew_jump` is left at its neutral 0.0 here; the evaluator fills it
    /// in from the rolling tracker so that append-then-read stays one
    /// atomic unit per symbol.
    pub async fn aggregate(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        window: &StrikeWindow,
        spot: Price,
        now: Timestamp,
    ) -> SignalBundle {
        let session_open = self.config.calendar.session_open_for(now);

        let (dce, dpe) = self.premium_deltas(symbol, expiry, window).await;
        let call_vol_ratio = self.call_volume_ratio(symbol, expiry, window, session_open).await;
        let confirmations = self.confirmations(symbol, expiry, window, session_open).await;
        let doi_put = self.put_oi_delta(symbol, expiry, window).await;
        let skew = self.atm_skew(symbol, expiry, window.atm, spot, now).await;

        SignalBundle {
            dce,
            dpe,
            doi_put,
            call_vol_ratio,
            skew,
            skew_jump: 0.0,
            confirmations,
        }
    }

    /// Sum premium moves over the delta window, per leg kind, 2 dp.
    /// Legs without a resolvable instrument or quote contribute nothing.
    async fn premium_deltas(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        window: &StrikeWindow,
    ) -> (Decimal, Decimal) {
        let mut dce = Decimal::ZERO;
        let mut dpe = Decimal::ZERO;

        for strike in &window.delta {
            if let Some(quote) = self.leg_quote(symbol, expiry, *strike, OptionKind::Call).await {
                dce += quote.premium_delta();
            }
            if let Some(quote) = self.leg_quote(symbol, expiry, *strike, OptionKind::Put).await {
                dpe += quote.premium_delta();
            }
        }

        (dce.round_dp(2), dpe.round_dp(2))
    }

    /// Max latest-bar volume ratio across the delta window's call legs.
    /// One strongly active strike is enough to suggest real participation.
    async fn call_volume_ratio(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        window: &StrikeWindow,
        session_open: Timestamp,
    ) -> f64 {
        let mut best = 0.0_f64;

        for strike in &window.delta {
            let Some(id) = self.leg(symbol, expiry, *strike, OptionKind::Call).await else {
                continue;
            };
            let Some(bars) = self.leg_bars(&id, session_open).await else {
                continue;
            };
            let ratio = latest_volume_ratio(&bars);
            if ratio > best {
                best = ratio;
            }
        }

        best
    }

    /// Per-strike confirmation tags over the full display window, for
    /// both leg kinds. Absence of an instrument or of any bars yields
    /// "not confirmed".
    async fn confirmations(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        window: &StrikeWindow,
        session_open: Timestamp,
    ) -> Vec<LegConfirmation> {
        let mut tags = Vec::with_capacity(window.display.len() * 2);

        for strike in &window.display {
            for kind in [OptionKind::Call, OptionKind::Put] {
                let confirmed = match self.leg(symbol, expiry, *strike, kind).await {
                    Some(id) => match self.leg_bars(&id, session_open).await {
                        Some(bars) => leg_confirms(&bars, kind),
                        None => false,
                    },
                    None => false,
                };
                tags.push(LegConfirmation {
                    strike: *strike,
                    kind,
                    confirmed,
                });
            }
        }

        tags
    }

    /// Put open-interest change vs the session-open baseline over the
    /// baseline window. Legs missing a baseline entry subtract 0; legs
    /// without a live quote are skipped entirely.
    async fn put_oi_delta(&self, symbol: &Symbol, expiry: NaiveDate, window: &StrikeWindow) -> i64 {
        let mut delta = 0_i64;

        for strike in &window.baseline {
            let Some(id) = self.leg(symbol, expiry, *strike, OptionKind::Put).await else {
                continue;
            };
            if let Some(quote) = self.quote(&id).await {
                let recorded = self.baseline.baseline_oi(&id).unwrap_or(0);
                delta += quote.open_interest as i64 - recorded as i64;
            }
        }

        delta
    }

    /// 100 x (ATM call IV - ATM put IV), 2 dp; 0.0 when either leg is
    /// unresolvable.
    async fn atm_skew(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        atm: Price,
        spot: Price,
        now: Timestamp,
    ) -> f64 {
        let Some(call_quote) = self.leg_quote(symbol, expiry, atm, OptionKind::Call).await else {
            return 0.0;
        };
        let Some(put_quote) = self.leg_quote(symbol, expiry, atm, OptionKind::Put).await else {
            return 0.0;
        };

        let (Some(s), Some(k)) = (spot.to_f64(), atm.to_f64()) else {
            return 0.0;
        };
        if s <= 0.0 || k <= 0.0 {
            return 0.0;
        }

        let t = self.years_to_expiry(expiry, now);
        let r = self.config.risk_free_rate;
        let q = self.config.dividend_yield;

        let iv_call = match call_quote.last_price.to_f64() {
            Some(price) => implied_vol(price, s, k, t, r, q, OptionKind::Call),
            None => return 0.0,
        };
        let iv_put = match put_quote.last_price.to_f64() {
            Some(price) => implied_vol(price, s, k, t, r, q, OptionKind::Put),
            None => return 0.0,
        };

        round2(100.0 * (iv_call - iv_put))
    }

    /// Calendar years between the current trading day and expiry
    fn years_to_expiry(&self, expiry: NaiveDate, now: Timestamp) -> f64 {
        let today = self.config.calendar.trading_day(now);
        (expiry - today).num_days().max(0) as f64 / 365.0
    }

    /// Resolve one option leg; `None` for unlisted legs and lookup failures
    async fn leg(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        strike: Price,
        kind: OptionKind,
    ) -> Option<InstrumentId> {
        match timeout(
            self.config.data_timeout(),
            self.resolver.option_instrument(symbol, expiry, strike, kind),
        )
        .await
        {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                debug!("[Aggregator] {symbol} {strike}{kind}: resolve failed: {e}");
                None
            }
            Err(_) => {
                debug!("[Aggregator] {symbol} {strike}{kind}: resolve timed out");
                None
            }
        }
    }

    async fn leg_quote(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        strike: Price,
        kind: OptionKind,
    ) -> Option<Quote> {
        let id = self.leg(symbol, expiry, strike, kind).await?;
        self.quote(&id).await
    }

    async fn quote(&self, id: &InstrumentId) -> Option<Quote> {
        match timeout(self.config.data_timeout(), self.market.quote(id)).await {
            Ok(Ok(quote)) => Some(quote),
            Ok(Err(e)) => {
                debug!("[Aggregator] quote {id} unavailable: {e}");
                None
            }
            Err(_) => {
                debug!("[Aggregator] quote {id} timed out");
                None
            }
        }
    }

    async fn leg_bars(&self, id: &InstrumentId, since: Timestamp) -> Option<Vec<Candle>> {
        match timeout(self.config.data_timeout(), self.market.bars(id, since)).await {
            Ok(Ok(bars)) => Some(bars),
            Ok(Err(e)) => {
                debug!("[Aggregator] bars {id} unavailable: {e}");
                None
            }
            Err(_) => {
                debug!("[Aggregator] bars {id} timed out");
                None
            }
        }
    }
}

/// Latest 5-minute volume over the mean of the 3 bars preceding it.
/// Fewer than 4 bars since session open, or a silent trailing window,
/// yields an explicit 0.0.
fn latest_volume_ratio(bars: &[Candle]) -> f64 {
    if bars.len() < TRAILING_BARS + 1 {
        return 0.0;
    }

    let latest = bars[bars.len() - 1].volume as f64;
    let trailing = &bars[bars.len() - 1 - TRAILING_BARS..bars.len() - 1];
    let mean = trailing.iter().map(|b| b.volume as f64).sum::<f64>() / TRAILING_BARS as f64;

    if mean == 0.0 { 0.0 } else { latest / mean }
}

/// Volume-spike confirmation for one leg: the latest bar carries the
/// session's highest volume and its direction matches the confirming
/// direction for the leg kind (a rising bar confirms a put, a falling
/// bar confirms a call).
fn leg_confirms(bars: &[Candle], kind: OptionKind) -> bool {
    let Some(last) = bars.last() else {
        return false;
    };

    let session_max = bars.iter().map(|b| b.volume).max().unwrap_or(0);
    if last.volume < session_max {
        return false;
    }

    match kind {
        OptionKind::Put => last.is_rising(),
        OptionKind::Call => last.is_falling(),
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
