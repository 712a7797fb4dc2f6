//! In-process open-interest baseline, one trading day at a time.

use std::sync::RwLock;

use chrono::NaiveDate;
use dashmap::DashMap;
use vega_core::InstrumentId;
use vega_ports::{BaselineReader, BaselineSnapshot};

/// Open interest captured at session open, keyed by option instrument id.
///
/// Written only by the capture job, read by concurrently running
/// evaluations. Entries are insert-once for a given trading day; a new
/// day's capture run clears the map before repopulating it. Readers may
/// observe a partial baseline mid-capture - the aggregator's
/// missing-leg-contributes-0 rule absorbs that.
#[derive(Debug)]
pub struct OiBaseline {
    day: RwLock<NaiveDate>,
    entries: DashMap<String, u64>,
}

impl OiBaseline {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day: RwLock::new(day),
            entries: DashMap::new(),
        }
    }

    /// Trading day the current entries belong to
    pub fn day(&self) -> NaiveDate {
        *self.day.read().expect("baseline day lock poisoned")
    }

    /// Roll to a new trading day, dropping the previous day's entries.
    /// A no-op when the day is unchanged.
    pub fn begin_day(&self, day: NaiveDate) {
        let mut current = self.day.write().expect("baseline day lock poisoned");
        if *current != day {
            *current = day;
            self.entries.clear();
        }
    }

    /// Record one leg's open interest. Returns false when the leg was
    /// already captured; existing entries are never overwritten within a
    /// day.
    pub fn record(&self, instrument: &InstrumentId, open_interest: u64) -> bool {
        let mut recorded = false;
        self.entries
            .entry(instrument.as_str().to_string())
            .or_insert_with(|| {
                recorded = true;
                open_interest
            });
        recorded
    }

    pub fn contains(&self, instrument: &InstrumentId) -> bool {
        self.entries.contains_key(instrument.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy-out for persistence
    pub fn snapshot(&self) -> BaselineSnapshot {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    /// Merge a persisted snapshot back in (restart recovery). Live
    /// entries win over persisted ones.
    pub fn hydrate(&self, snapshot: &BaselineSnapshot) {
        for (id, oi) in snapshot {
            self.entries.entry(id.clone()).or_insert(*oi);
        }
    }
}

impl BaselineReader for OiBaseline {
    fn baseline_oi(&self, instrument: &InstrumentId) -> Option<u64> {
        self.entries.get(instrument.as_str()).map(|e| *e.value())
    }
}
