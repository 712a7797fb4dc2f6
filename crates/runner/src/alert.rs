//! Inbound alert records.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use vega_core::{Symbol, Timestamp};

/// Raw event timestamp as scanners actually send it: epoch seconds as a
/// number, epoch seconds as a string, or an ISO-8601 datetime string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Seconds(i64),
    Text(String),
}

/// One inbound alert, as posted by the scanner webhook.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlertEvent {
    /// Underlying symbol the alert fired for
    pub symbol: Symbol,
    /// Event timestamp; optional and tolerantly parsed
    #[serde(default)]
    pub triggered_at: Option<RawTimestamp>,
    /// Scanner's move description, passed through to the record
    #[serde(default)]
    pub trigger: Option<String>,
}

impl AlertEvent {
    pub fn new(symbol: impl Into<Symbol>) -> Self {
        Self {
            symbol: symbol.into(),
            triggered_at: None,
            trigger: None,
        }
    }

    /// Event time of the alert, falling back to `fallback` (the
    /// evaluation instant) when the timestamp is absent or unparseable.
    pub fn event_time(&self, fallback: Timestamp) -> Timestamp {
        match &self.triggered_at {
            Some(RawTimestamp::Seconds(secs)) => epoch_seconds(*secs).unwrap_or(fallback),
            Some(RawTimestamp::Text(text)) => parse_text_timestamp(text).unwrap_or(fallback),
            None => fallback,
        }
    }
}

fn epoch_seconds(secs: i64) -> Option<Timestamp> {
    Utc.timestamp_opt(secs, 0).single()
}

fn parse_text_timestamp(text: &str) -> Option<Timestamp> {
    let text = text.trim();

    if let Ok(secs) = text.parse::<i64>() {
        return epoch_seconds(secs);
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Some(with_offset.with_timezone(&Utc));
    }

    // Bare ISO-8601 without an offset is taken as UTC
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    None
}
