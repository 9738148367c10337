use chrono::{DateTime, Duration, Utc};

use crate::tracker::day_stats::DayStats;
use crate::tracker::history::{HistoryEntry, HistoryStore, HISTORY_DAYS};

/// The signal is recomputed at most once per window so it does not flicker.
pub const RECALC_INTERVAL_MINS: i64 = 20;

/// Floor on the multi-day range denominator, in INR per gram. Tunable: it
/// only exists to keep the position defined when the range collapses.
pub const MIN_RANGE: f64 = 1.0;

pub const POS_BUY_MAX: f64 = 0.35;
pub const POS_WAIT_MIN: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Risk {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Risk::Low => f.write_str("Low"),
            Risk::Medium => f.write_str("Medium"),
            Risk::High => f.write_str("High"),
        }
    }
}

/// Where the current price sits inside the observed multi-day range, plus
/// the discrete recommendation derived from it.
#[derive(Debug, Clone)]
pub struct BuyWindow {
    pub badge: &'static str,
    pub title: &'static str,
    pub description: String,
    pub action: &'static str,
    pub time: String,
    pub risk: Risk,
    pub pos: f64,
}

fn loading(title: &'static str, description: &str, action: &'static str) -> BuyWindow {
    BuyWindow {
        badge: "⏳ LOADING",
        title,
        description: description.to_string(),
        action,
        time: format!("Last {} days", HISTORY_DAYS),
        risk: Risk::Low,
        pos: 0.5,
    }
}

fn money_inr(n: f64) -> String {
    format!("₹ {:.2}", n)
}

/// History entries plus today's partial stats, when today qualifies.
fn combined_entries(day_stats: &DayStats, history: &HistoryStore) -> Vec<HistoryEntry> {
    let mut combined: Vec<HistoryEntry> = history.entries().to_vec();
    if let Some(today) = day_stats.finalize() {
        combined.push(today);
    }
    combined
}

/// Classify the current price against the combined multi-day range.
pub fn build_buy_window(
    current: Option<f64>,
    day_stats: &DayStats,
    history: &HistoryStore,
) -> BuyWindow {
    let Some(current) = current else {
        return loading(
            "Collecting price data…",
            "Wait a minute so the app can learn movement.",
            "Keep tracking for 1–2 minutes.",
        );
    };

    let combined = combined_entries(day_stats, history);
    if combined.is_empty() {
        return loading(
            "Collecting multi-day range…",
            "No history yet. Keep app open for some time.",
            "Come back after some minutes.",
        );
    }

    let multi_low = combined.iter().map(|e| e.low).fold(f64::INFINITY, f64::min);
    let multi_high = combined.iter().map(|e| e.high).fold(f64::NEG_INFINITY, f64::max);
    let multi_avg = combined.iter().map(|e| e.avg).sum::<f64>() / combined.len() as f64;

    let range = (multi_high - multi_low).max(MIN_RANGE);
    let pos = ((current - multi_low) / range).clamp(0.0, 1.0);

    let (badge, title, description, action, risk) = if pos <= POS_BUY_MAX {
        (
            "🟢 BUY OK",
            "Good buy window (near multi-day low)",
            "Gold is closer to the lower zone of recent days.",
            "Good for planned purchase. Consider buying partial quantity.",
            Risk::Low,
        )
    } else if pos >= POS_WAIT_MIN {
        (
            "🔴 WAIT",
            "Avoid buying (near multi-day high)",
            "Gold is near higher zone compared to recent days.",
            "Wait for pullback. Set a price alert.",
            Risk::High,
        )
    } else {
        (
            "🟡 WATCH",
            "Average zone — track for dip",
            "Gold is around the multi-day middle zone.",
            "If not urgent, wait for a better dip.",
            Risk::Medium,
        )
    };

    BuyWindow {
        badge,
        title,
        description: format!(
            "{}\nMulti-Low: {} • Multi-Avg: {} • Multi-High: {}",
            description,
            money_inr(multi_low),
            money_inr(multi_avg),
            money_inr(multi_high)
        ),
        action,
        time: format!("Last {} days", HISTORY_DAYS.min(combined.len())),
        risk,
        pos,
    }
}

/// Timestamp-guarded memo around [`build_buy_window`]. A forced refresh
/// clears the guard so the next read recomputes immediately.
pub struct BuyWindowCache {
    last_calc_at: Option<DateTime<Utc>>,
    value: BuyWindow,
}

impl BuyWindowCache {
    pub fn new() -> Self {
        Self {
            last_calc_at: None,
            value: loading(
                "Collecting price data…",
                "Wait a minute so the app can learn movement.",
                "Keep tracking for 1–2 minutes.",
            ),
        }
    }

    pub fn current(
        &mut self,
        current_price: Option<f64>,
        day_stats: &DayStats,
        history: &HistoryStore,
    ) -> &BuyWindow {
        let now = Utc::now();
        let stale = self
            .last_calc_at
            .map_or(true, |at| now - at > Duration::minutes(RECALC_INTERVAL_MINS));

        if stale {
            self.value = build_buy_window(current_price, day_stats, history);
            self.last_calc_at = Some(now);
        }
        &self.value
    }

    pub fn force_refresh(&mut self) {
        self.last_calc_at = None;
    }
}

impl Default for BuyWindowCache {
    fn default() -> Self {
        Self::new()
    }
}
