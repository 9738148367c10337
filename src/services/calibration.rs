use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::info;

use crate::errors::AppError;
use crate::models::Quote;
use crate::services::pricing::round2;

/// Default Srinagar retail premium (tune for local market).
pub const DEFAULT_PREMIUM_PCT: f64 = 4.8;

pub const PREMIUM_MIN: f64 = 0.0;
pub const PREMIUM_MAX: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub fetched_at: DateTime<Utc>,
    pub value: T,
}

impl<T> CacheEntry<T> {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

struct MarketInner {
    premium_pct: f64,
    cache: Option<CacheEntry<Quote>>,
}

/// Process-wide calibration plus the single-slot quote cache. One lock
/// guards both so a premium update and the cache invalidation it forces are
/// observed atomically: no reader can see a stale quote after calibration
/// changed.
pub struct MarketState {
    inner: Mutex<MarketInner>,
}

impl MarketState {
    pub fn new(premium_pct: f64) -> Self {
        Self {
            inner: Mutex::new(MarketInner { premium_pct, cache: None }),
        }
    }

    pub fn premium_pct(&self) -> f64 {
        self.inner.lock().premium_pct
    }

    /// Validates, rounds to 2 decimals, stores, and clears the quote cache.
    /// Rejection happens before any state mutation.
    pub fn set_premium(&self, premium_pct: f64) -> Result<f64, AppError> {
        if !premium_pct.is_finite() || !(PREMIUM_MIN..=PREMIUM_MAX).contains(&premium_pct) {
            return Err(AppError::Validation(
                "Invalid premiumPct (0 to 12). Example: { premiumPct: 5.2 }".to_string(),
            ));
        }

        let rounded = round2(premium_pct);
        let mut inner = self.inner.lock();
        inner.premium_pct = rounded;
        inner.cache = None;
        info!("✓ Premium updated to {}%, quote cache invalidated", rounded);
        Ok(rounded)
    }

    /// Returns the cached quote when the slot is populated and fresh.
    pub fn cached_quote(&self, now: DateTime<Utc>, ttl: Duration) -> Option<Quote> {
        let inner = self.inner.lock();
        inner
            .cache
            .as_ref()
            .filter(|entry| entry.is_fresh(now, ttl))
            .map(|entry| entry.value.clone())
    }

    /// Stores a freshly computed quote, unless calibration moved while the
    /// computation was in flight; a quote built against a stale premium must
    /// never land in the slot.
    pub fn store_quote(&self, quote: Quote, fetched_at: DateTime<Utc>) {
        let mut inner = self.inner.lock();
        if inner.premium_pct == quote.premium_pct {
            inner.cache = Some(CacheEntry { fetched_at, value: quote });
        }
    }

    pub fn invalidate(&self) {
        self.inner.lock().cache = None;
    }
}

impl Default for MarketState {
    fn default() -> Self {
        Self::new(DEFAULT_PREMIUM_PCT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_domain_premiums_without_mutating() {
        let state = MarketState::default();

        for bad in [-1.0, 13.0, f64::NAN, f64::INFINITY] {
            assert!(state.set_premium(bad).is_err());
            assert_eq!(state.premium_pct(), DEFAULT_PREMIUM_PCT);
        }
    }

    #[test]
    fn accepts_and_rounds_valid_premium() {
        let state = MarketState::default();
        assert_eq!(state.set_premium(5.236).unwrap(), 5.24);
        assert_eq!(state.premium_pct(), 5.24);

        // Idempotent under repeated identical values.
        assert_eq!(state.set_premium(5.24).unwrap(), 5.24);
        assert_eq!(state.premium_pct(), 5.24);
    }

    #[test]
    fn domain_bounds_are_inclusive() {
        let state = MarketState::default();
        assert_eq!(state.set_premium(0.0).unwrap(), 0.0);
        assert_eq!(state.set_premium(12.0).unwrap(), 12.0);
    }
}
