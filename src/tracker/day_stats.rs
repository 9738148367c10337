use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::tracker::history::HistoryEntry;

/// Running low/high/sum/count for the current calendar day. Exactly one
/// instance is live at a time; it is mutated in place as samples arrive and
/// finalized into a [`HistoryEntry`] on day rollover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStats {
    pub day: NaiveDate,
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub sum: f64,
    pub count: u32,
}

impl DayStats {
    pub fn fresh(day: NaiveDate) -> Self {
        Self { day, low: None, high: None, sum: 0.0, count: 0 }
    }

    /// Feed one sample taken on `day`. Returns the finalized previous day
    /// when the calendar rolled over and the old stats are worth keeping.
    /// Non-finite samples are ignored entirely.
    pub fn observe(&mut self, day: NaiveDate, value: f64) -> Option<HistoryEntry> {
        if !value.is_finite() {
            return None;
        }

        let finalized = if self.day != day {
            let prior = self.finalize();
            *self = Self::fresh(day);
            prior
        } else {
            None
        };

        self.low = Some(self.low.map_or(value, |low| low.min(value)));
        self.high = Some(self.high.map_or(value, |high| high.max(value)));
        self.sum += value;
        self.count += 1;

        finalized
    }

    /// A day only becomes history when it actually saw samples with finite
    /// bounds.
    pub fn finalize(&self) -> Option<HistoryEntry> {
        match (self.low, self.high) {
            (Some(low), Some(high)) if self.count > 0 && low.is_finite() && high.is_finite() => {
                Some(HistoryEntry {
                    day: self.day,
                    low,
                    high,
                    avg: self.sum / self.count as f64,
                })
            }
            _ => None,
        }
    }

    pub fn avg(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}
