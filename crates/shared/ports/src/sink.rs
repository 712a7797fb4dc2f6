use async_trait::async_trait;
use vega_core::AlertRecord;

use crate::error::DataResult;

/// Port for delivering finished alert records to the consumer side
/// (dashboard, notification, persistence). The core has no dependency on
/// how a record is displayed or delivered.
#[async_trait]
pub trait VerdictSink: Send + Sync {
    async fn deliver(&self, record: &AlertRecord) -> DataResult<()>;
}
