use async_trait::async_trait;
use chrono::NaiveDate;
use vega_core::{InstrumentId, OptionKind, Price, Symbol};

use crate::error::DataResult;

/// Port for instrument-metadata and option-symbol lookup
#[async_trait]
pub trait InstrumentResolver: Send + Sync {
    /// Nearest tradable expiry for the symbol's option chain
    async fn resolve_expiry(&self, symbol: &Symbol) -> DataResult<NaiveDate>;

    /// Distinct strike prices available for the resolved expiry.
    /// May be empty: the caller must treat that as "no option chain".
    async fn strikes(&self, symbol: &Symbol, expiry: NaiveDate) -> DataResult<Vec<Price>>;

    /// Identifier of one option leg, or `None` when no such instrument
    /// is listed
    async fn option_instrument(
        &self,
        symbol: &Symbol,
        expiry: NaiveDate,
        strike: Price,
        kind: OptionKind,
    ) -> DataResult<Option<InstrumentId>>;
}
