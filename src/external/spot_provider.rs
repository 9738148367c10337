use async_trait::async_trait;
use thiserror::Error;

/// USD-per-troy-ounce spot prices for both metals, fetched in one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotPrices {
    pub gold_usd_oz: f64,
    pub silver_usd_oz: f64,
}

#[derive(Debug, Error)]
pub enum SpotProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Spot price has no fallback chain: upstream unavailability is a hard
/// failure for the whole quote computation.
#[async_trait]
pub trait SpotProvider: Send + Sync {
    async fn fetch_spot(&self) -> Result<SpotPrices, SpotProviderError>;
}
