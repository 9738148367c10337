pub mod buy_window;
pub mod day_stats;
pub mod history;
pub mod mood;
pub mod series;
pub mod store;

use chrono::NaiveDate;
use tracing::warn;

pub use buy_window::{BuyWindow, BuyWindowCache};
pub use day_stats::DayStats;
pub use history::{HistoryEntry, HistoryStore};
pub use mood::{build_market_mood, MarketMood};
pub use series::{PriceSample, PriceSeries};
pub use store::{JsonFileStore, StateRepository, DAY_STATS_KEY, HISTORY_KEY};

/// DayStats writes are throttled; history loss of at most a few samples is
/// accepted, rollovers always flush.
const DAY_STATS_SAVE_EVERY: u32 = 3;

/// The client session: accumulates the live series, rolls it into daily and
/// multi-day statistics, and serves the classifiers. DayStats and the
/// history survive restarts via the repository; the series does not.
pub struct Tracker<R: StateRepository> {
    repo: R,
    series: PriceSeries,
    day_stats: DayStats,
    history: HistoryStore,
    buy_window: BuyWindowCache,
}

impl<R: StateRepository> Tracker<R> {
    /// Reload persisted state, treating corrupt or missing files as a fresh
    /// start. A stale persisted DayStats for an earlier day is kept as-is;
    /// the first sample of the session rolls it into history.
    pub fn load(repo: R, today: NaiveDate) -> Self {
        let day_stats = repo
            .load::<DayStats>(DAY_STATS_KEY)
            .unwrap_or_else(|| DayStats::fresh(today));
        let history = repo.load::<HistoryStore>(HISTORY_KEY).unwrap_or_default();

        Self {
            repo,
            series: PriceSeries::new(),
            day_stats,
            history,
            buy_window: BuyWindowCache::new(),
        }
    }

    /// One poll tick: append to the series and feed the day statistics,
    /// persisting per policy. A reported silver price of zero falls back to
    /// the last seen value.
    pub fn record_sample(&mut self, label: String, gold: f64, silver: f64, today: NaiveDate) {
        let silver = if silver > 0.0 {
            silver
        } else {
            self.series.last_silver().unwrap_or(0.0)
        };

        if let Some(finalized) = self.day_stats.observe(today, gold) {
            self.history.submit(finalized);
            self.persist(HISTORY_KEY, &self.history);
            // Rollover always flushes the fresh day stats too.
            self.persist(DAY_STATS_KEY, &self.day_stats);
        } else if self.day_stats.count > 0 && self.day_stats.count % DAY_STATS_SAVE_EVERY == 0 {
            self.persist(DAY_STATS_KEY, &self.day_stats);
        }

        self.series.push(PriceSample { label, gold_per_gram: gold, silver_per_gram: silver });
    }

    fn persist<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.repo.save(key, value) {
            warn!("Failed to persist '{}': {}", key, e);
        }
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn day_stats(&self) -> &DayStats {
        &self.day_stats
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn buy_window(&mut self) -> BuyWindow {
        self.buy_window
            .current(self.series.last_gold(), &self.day_stats, &self.history)
            .clone()
    }

    pub fn force_buy_window_refresh(&mut self) {
        self.buy_window.force_refresh();
    }

    pub fn market_mood(&self) -> MarketMood {
        build_market_mood(&self.series.gold_values(), &self.series.silver_values())
    }
}
