use async_trait::async_trait;
use vega_core::{Candle, InstrumentId, Price, Quote, Symbol, Timestamp};

use crate::error::DataResult;

/// Port for live market data access
///
/// The only port whose calls suspend on network I/O. All methods may fail
/// transiently; the engine treats failure as "signal unavailable", not
/// fatal, and wraps every call in a bounded timeout.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Underlying last traded price
    async fn spot(&self, symbol: &Symbol) -> DataResult<Price>;

    /// Point-in-time quote for one option instrument
    async fn quote(&self, instrument: &InstrumentId) -> DataResult<Quote>;

    /// 5-minute OHLCV bars for one instrument since session open,
    /// oldest first
    async fn bars(&self, instrument: &InstrumentId, since: Timestamp) -> DataResult<Vec<Candle>>;
}
