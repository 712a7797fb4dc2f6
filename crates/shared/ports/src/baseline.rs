use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use vega_core::InstrumentId;

use crate::error::DataResult;

/// Read-side view of the open-interest baseline.
///
/// Written only by the capture job; read by concurrently running
/// evaluations. A read during capture may observe a partial baseline -
/// callers degrade via the "missing leg contributes 0" rule.
pub trait BaselineReader: Send + Sync {
    /// Open interest recorded at session open for one instrument
    fn baseline_oi(&self, instrument: &InstrumentId) -> Option<u64>;
}

/// Serialized form of the open-interest baseline: instrument id to the
/// open interest captured at session open.
pub type BaselineSnapshot = BTreeMap<String, u64>;

/// Port for durable baseline persistence, keyed by trading day
///
/// The capture job saves after each poll tick (best-effort), so a restart
/// mid-session resumes from whatever was already captured.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Load the snapshot for a trading day; empty when none was captured
    async fn load(&self, day: NaiveDate) -> DataResult<BaselineSnapshot>;

    /// Persist the snapshot for a trading day
    async fn save(&self, day: NaiveDate, snapshot: &BaselineSnapshot) -> DataResult<()>;
}
