use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::AppError;
use crate::external::{FxFallbackResolver, SpotProvider};
use crate::models::{Quote, SpotSnapshot};
use crate::services::calibration::MarketState;
use crate::services::pricing::compute_quote;

/// Freshness window for the published quote.
pub const LIVE_CACHE_TTL_MS: i64 = 4000;

/// Fetches spot + FX, computes the published quote, and memoizes it in the
/// shared single-slot cache for [`LIVE_CACHE_TTL_MS`].
pub struct QuoteService {
    spot: Arc<dyn SpotProvider>,
    fx: FxFallbackResolver,
    market: Arc<MarketState>,
    ttl: Duration,
}

impl QuoteService {
    pub fn new(spot: Arc<dyn SpotProvider>, fx: FxFallbackResolver, market: Arc<MarketState>) -> Self {
        Self {
            spot,
            fx,
            market,
            ttl: Duration::milliseconds(LIVE_CACHE_TTL_MS),
        }
    }

    #[cfg(test)]
    fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Read path for `GET /api/live`. A fresh cache hit makes no upstream
    /// calls; a miss runs the full fetch-compute-store sequence. Upstream
    /// failure surfaces to the caller and leaves any existing entry alone.
    pub async fn live_quote(&self) -> Result<Quote, AppError> {
        let now = Utc::now();
        if let Some(quote) = self.market.cached_quote(now, self.ttl) {
            return Ok(quote);
        }

        let snapshot = self.fetch_snapshot().await?;
        let premium_pct = self.market.premium_pct();

        // The freshness window starts when the entry lands, not when the
        // round trip began; a slow upstream must not shorten it.
        let stored_at = Utc::now();
        let quote = compute_quote(snapshot, premium_pct, stored_at);
        self.market.store_quote(quote.clone(), stored_at);
        info!(
            "✓ Quote recomputed: gold ₹{}/g (premium {}%)",
            quote.gold.inr_per_gram24, quote.premium_pct
        );
        Ok(quote)
    }

    async fn fetch_snapshot(&self) -> Result<SpotSnapshot, AppError> {
        let spot = self.spot.fetch_spot().await.map_err(|e| {
            error!("Spot fetch failed: {}", e);
            AppError::External(e.to_string())
        })?;

        // FX is resolved through the fallback chain and cannot fail.
        let usd_to_inr = self.fx.resolve().await;

        Ok(SpotSnapshot {
            gold_usd_oz: spot.gold_usd_oz,
            silver_usd_oz: spot.silver_usd_oz,
            usd_to_inr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{SpotPrices, SpotProviderError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct StubSpot {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    impl StubSpot {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), fail: AtomicBool::new(false) })
        }
    }

    #[async_trait]
    impl SpotProvider for StubSpot {
        async fn fetch_spot(&self) -> Result<SpotPrices, SpotProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(SpotProviderError::BadResponse("Gold upstream invalid price".into()));
            }
            Ok(SpotPrices { gold_usd_oz: 2400.0, silver_usd_oz: 29.0 })
        }
    }

    struct SlowSpot;

    #[async_trait]
    impl SpotProvider for SlowSpot {
        async fn fetch_spot(&self) -> Result<SpotPrices, SpotProviderError> {
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            Ok(SpotPrices { gold_usd_oz: 2400.0, silver_usd_oz: 29.0 })
        }
    }

    fn service(spot: Arc<StubSpot>, market: Arc<MarketState>) -> QuoteService {
        QuoteService::new(spot, FxFallbackResolver::new(vec![]), market)
    }

    #[tokio::test]
    async fn reads_within_ttl_share_one_upstream_fetch() {
        let spot = StubSpot::new();
        let market = Arc::new(MarketState::default());
        let svc = service(spot.clone(), market);

        let first = svc.live_quote().await.unwrap();
        let second = svc.live_quote().await.unwrap();

        assert_eq!(first.updated_at, second.updated_at);
        assert_eq!(spot.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn calibration_change_forces_recompute() {
        let spot = StubSpot::new();
        let market = Arc::new(MarketState::default());
        let svc = service(spot.clone(), market.clone());

        let before = svc.live_quote().await.unwrap();
        market.set_premium(6.0).unwrap();
        let after = svc.live_quote().await.unwrap();

        assert_eq!(spot.calls.load(Ordering::SeqCst), 2);
        assert_eq!(after.premium_pct, 6.0);
        assert!(after.gold.inr_per_gram24 > before.gold.inr_per_gram24);
    }

    #[tokio::test]
    async fn expired_cache_triggers_fresh_fetch() {
        let spot = StubSpot::new();
        let market = Arc::new(MarketState::default());
        let svc = service(spot.clone(), market).with_ttl(Duration::zero());

        svc.live_quote().await.unwrap();
        svc.live_quote().await.unwrap();
        assert_eq!(spot.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_without_touching_valid_cache() {
        let spot = StubSpot::new();
        let market = Arc::new(MarketState::default());
        let svc = service(spot.clone(), market.clone());

        let cached = svc.live_quote().await.unwrap();
        spot.fail.store(true, Ordering::SeqCst);

        // Fresh entry still served; no upstream call, no error.
        assert_eq!(svc.live_quote().await.unwrap().updated_at, cached.updated_at);

        // The slot survives even a failed recompute attempt.
        let strict = Duration::hours(1);
        assert!(market.cached_quote(Utc::now(), strict).is_some());
    }

    #[tokio::test]
    async fn failure_with_no_cache_is_an_error() {
        let spot = StubSpot::new();
        spot.fail.store(true, Ordering::SeqCst);
        let svc = service(spot, Arc::new(MarketState::default()));

        assert!(matches!(svc.live_quote().await, Err(AppError::External(_))));
    }

    #[tokio::test]
    async fn freshness_window_starts_when_the_entry_is_stored() {
        let market = Arc::new(MarketState::default());
        let svc = QuoteService::new(
            Arc::new(SlowSpot),
            FxFallbackResolver::new(vec![]),
            market.clone(),
        );

        svc.live_quote().await.unwrap();

        // The fetch took ~100ms; an entry timestamped before the round trip
        // would already look older than this window.
        assert!(market.cached_quote(Utc::now(), Duration::milliseconds(80)).is_some());
    }

    #[tokio::test]
    async fn fx_defaults_flow_into_quote_when_chain_is_empty() {
        let spot = StubSpot::new();
        let svc = service(spot, Arc::new(MarketState::default()));

        let quote = svc.live_quote().await.unwrap();
        assert_eq!(quote.fx.usd_to_inr, crate::external::DEFAULT_USD_TO_INR);
    }
}
