use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregated stats for one finished day. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub day: NaiveDate,
    pub low: f64,
    pub high: f64,
    pub avg: f64,
}

/// Rolling window of past days, ordered ascending by day and unique per day.
pub const HISTORY_DAYS: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent replace-by-day, then sort and truncate to the newest
    /// [`HISTORY_DAYS`]. Guards against duplicate rollover submissions.
    pub fn submit(&mut self, entry: HistoryEntry) {
        self.entries.retain(|e| e.day != entry.day);
        self.entries.push(entry);
        self.entries.sort_by_key(|e| e.day);

        if self.entries.len() > HISTORY_DAYS {
            let excess = self.entries.len() - HISTORY_DAYS;
            self.entries.drain(..excess);
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
