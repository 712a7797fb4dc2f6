//! The finished alert record handed to the verdict consumer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::signals::{SignalBundle, Verdict};
use crate::values::{Price, Symbol, Timestamp};

/// One evaluated alert: the inbound event enriched with the aggregated
/// signals and the classifier's verdict. This is the full row the
/// dashboard/notification/persistence collaborators receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unique id for this evaluation
    pub id: Uuid,
    /// Underlying symbol the alert fired for
    pub symbol: Symbol,
    /// Event time of the inbound alert
    pub triggered_at: Timestamp,
    /// Scanner's move description, if the trigger carried one
    pub trigger: Option<String>,
    /// Underlying last traded price at evaluation time
    pub spot: Price,
    pub bundle: SignalBundle,
    pub verdict: Verdict,
}

impl AlertRecord {
    pub fn new(
        symbol: impl Into<Symbol>,
        triggered_at: Timestamp,
        trigger: Option<String>,
        spot: Price,
        bundle: SignalBundle,
        verdict: Verdict,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: symbol.into(),
            triggered_at,
            trigger,
            spot,
            bundle,
            verdict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::Trend;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_record_serde_round_trip() {
        let record = AlertRecord::new(
            "NIFTY",
            Utc::now(),
            Some("5m breakout".to_string()),
            dec!(22500.45),
            SignalBundle::default(),
            Verdict {
                flags: vec![],
                trend: Trend::Sideways,
            },
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: AlertRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
