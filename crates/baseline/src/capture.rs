//! Daily open-interest baseline capture.
//!
//! One execution per trading day, starting at the session-open instant.
//! The run polls the watched symbols at a fixed interval until every
//! symbol is satisfied or a hard deadline passes; per-leg lookup failures
//! are swallowed and retried on the next tick, and whatever was captured
//! is persisted either way.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep, sleep_until, timeout};
use vega_clock::SessionCalendar;
use vega_core::{InstrumentId, OptionKind, Price, Quote, Symbol};
use vega_engine::StrikeWindow;
use vega_engine::window::DEFAULT_RADIUS;
use vega_ports::{BaselineStore, Clock, InstrumentResolver, MarketData};

use crate::store::OiBaseline;

/// Capture job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Symbols whose put legs get a baseline
    pub symbols: Vec<Symbol>,
    /// Poll tick, milliseconds
    pub poll_interval_ms: u64,
    /// Hard deadline after session open, milliseconds
    pub capture_window_ms: u64,
    /// Recorded put legs at which a symbol counts as satisfied
    pub required_put_legs: usize,
    /// Strike-window radius used to derive the baseline window
    pub window_radius: usize,
    /// Bounded timeout per lookup, milliseconds
    pub data_timeout_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            poll_interval_ms: 20_000,
            capture_window_ms: 240_000,
            required_put_legs: 2,
            window_radius: DEFAULT_RADIUS,
            data_timeout_ms: 3_000,
        }
    }
}

impl CaptureConfig {
    fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    fn capture_window(&self) -> Duration {
        Duration::from_millis(self.capture_window_ms)
    }

    fn data_timeout(&self) -> Duration {
        Duration::from_millis(self.data_timeout_ms)
    }
}

/// The recurring baseline capture job
pub struct BaselineCapture {
    market: Arc<dyn MarketData>,
    resolver: Arc<dyn InstrumentResolver>,
    store: Arc<dyn BaselineStore>,
    clock: Arc<dyn Clock>,
    baseline: Arc<OiBaseline>,
    calendar: SessionCalendar,
    config: CaptureConfig,
}

impl BaselineCapture {
    pub fn new(
        market: Arc<dyn MarketData>,
        resolver: Arc<dyn InstrumentResolver>,
        store: Arc<dyn BaselineStore>,
        clock: Arc<dyn Clock>,
        baseline: Arc<OiBaseline>,
        calendar: SessionCalendar,
        config: CaptureConfig,
    ) -> Self {
        Self {
            market,
            resolver,
            store,
            clock,
            baseline,
            calendar,
            config,
        }
    }

    /// Long-lived daily loop: compute the next session-open instant,
    /// sleep until it, run one capture, repeat.
    pub async fn run(&self) {
        loop {
            let now = self.clock.now();
            let next = self.calendar.next_open(now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!("[BaselineCapture] next capture at {next}");
            sleep(wait).await;

            let day = self.calendar.trading_day(self.clock.now());
            self.run_capture(day).await;
        }
    }

    /// One trading day's capture: bounded poll loop with a hard deadline.
    pub async fn run_capture(&self, day: NaiveDate) {
        self.baseline.begin_day(day);

        // Restart recovery: resume from whatever this day already has
        match self.store.load(day).await {
            Ok(snapshot) if !snapshot.is_empty() => {
                info!(
                    "[BaselineCapture] {day}: resuming with {} persisted legs",
                    snapshot.len()
                );
                self.baseline.hydrate(&snapshot);
            }
            Ok(_) => {}
            Err(e) => warn!("[BaselineCapture] {day}: baseline load failed: {e}"),
        }

        let deadline = Instant::now() + self.config.capture_window();
        let mut pending = self.config.symbols.clone();

        loop {
            let mut still_pending = Vec::new();
            for symbol in &pending {
                if !self.capture_symbol(symbol).await {
                    still_pending.push(symbol.clone());
                }
            }
            pending = still_pending;

            self.persist(day).await;

            if pending.is_empty() {
                info!(
                    "[BaselineCapture] {day}: all symbols satisfied, {} legs recorded",
                    self.baseline.len()
                );
                return;
            }

            let next_tick = Instant::now() + self.config.poll_interval();
            if next_tick >= deadline {
                sleep_until(deadline).await;
                warn!(
                    "[BaselineCapture] {day}: deadline reached with {} symbols unsatisfied",
                    pending.len()
                );
                return;
            }
            sleep_until(next_tick).await;
        }
    }

    /// Attempt one symbol. Returns true once the symbol is satisfied;
    /// any lookup failure leaves it pending for the next tick.
    async fn capture_symbol(&self, symbol: &Symbol) -> bool {
        let Some(spot) = self.spot(symbol).await else {
            return false;
        };
        let Some(expiry) = self.expiry(symbol).await else {
            return false;
        };
        let Some(strikes) = self.strikes(symbol, expiry).await else {
            return false;
        };
        let Some(window) = StrikeWindow::select(spot, &strikes, self.config.window_radius) else {
            debug!("[BaselineCapture] {symbol}: no option chain");
            return false;
        };

        let mut recorded = 0;
        for strike in &window.baseline {
            let Some(id) = self.put_leg(symbol, expiry, *strike).await else {
                continue;
            };

            if self.baseline.contains(&id) {
                recorded += 1;
                continue;
            }

            if let Some(quote) = self.quote(&id).await
                && quote.open_interest > 0
            {
                self.baseline.record(&id, quote.open_interest);
                debug!(
                    "[BaselineCapture] {symbol}: {id} baseline OI {}",
                    quote.open_interest
                );
                recorded += 1;
            }
        }

        recorded >= self.config.required_put_legs
    }

    async fn persist(&self, day: NaiveDate) {
        let snapshot = self.baseline.snapshot();
        if let Err(e) = self.store.save(day, &snapshot).await {
            warn!("[BaselineCapture] {day}: baseline save failed: {e}");
        }
    }

    async fn spot(&self, symbol: &Symbol) -> Option<Price> {
        match timeout(self.config.data_timeout(), self.market.spot(symbol)).await {
            Ok(Ok(spot)) => Some(spot),
            Ok(Err(e)) => {
                debug!("[BaselineCapture] {symbol}: spot failed: {e}");
                None
            }
            Err(_) => {
                debug!("[BaselineCapture] {symbol}: spot timed out");
                None
            }
        }
    }

    async fn expiry(&self, symbol: &Symbol) -> Option<NaiveDate> {
        match timeout(
            self.config.data_timeout(),
            self.resolver.resolve_expiry(symbol),
        )
        .await
        {
            Ok(Ok(expiry)) => Some(expiry),
            Ok(Err(e)) => {
                debug!("[BaselineCapture] {symbol}: expiry failed: {e}");
                None
            }
            Err(_) => None,
        }
    }

    async fn strikes(&self, symbol: &Symbol, expiry: NaiveDate) -> Option<Vec<Price>> {
        match timeout(
            self.config.data_timeout(),
            self.resolver.strikes(symbol, expiry),
        )
        .await
        {
            Ok(Ok(strikes)) => Some(strikes),
            Ok(Err(e)) => {
                debug!("[BaselineCapture] {symbol}: strikes failed: {e}");
                None
            }
            Err(_) => None,
        }
    }

    async fn put_leg(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        strike: Price,
    ) -> Option<InstrumentId> {
        match timeout(
            self.config.data_timeout(),
            self.resolver
                .option_instrument(symbol, expiry, strike, OptionKind::Put),
        )
        .await
        {
            Ok(Ok(id)) => id,
            Ok(Err(e)) => {
                debug!("[BaselineCapture] {symbol} {strike}PE: resolve failed: {e}");
                None
            }
            Err(_) => None,
        }
    }

    async fn quote(&self, id: &InstrumentId) -> Option<Quote> {
        match timeout(self.config.data_timeout(), self.market.quote(id)).await {
            Ok(Ok(quote)) => Some(quote),
            Ok(Err(e)) => {
                debug!("[BaselineCapture] quote {id} failed: {e}");
                None
            }
            Err(_) => None,
        }
    }
}
