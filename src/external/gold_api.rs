use async_trait::async_trait;
use serde::Deserialize;

use crate::external::spot_provider::{SpotPrices, SpotProvider, SpotProviderError};

const BASE_URL: &str = "https://api.gold-api.com/price";

pub struct GoldApiProvider {
    client: reqwest::Client,
    base_url: String,
}

// Minimal response struct (only what we need)
#[derive(Debug, Deserialize)]
struct GoldApiPrice {
    price: Option<f64>,
}

impl GoldApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("Mozilla/5.0 (GoldWise FX)")
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into(),
        }
    }

    async fn fetch_symbol(&self, symbol: &str) -> Result<f64, SpotProviderError> {
        let url = format!("{}/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SpotProviderError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SpotProviderError::BadResponse(format!(
                "Upstream {} for {}",
                resp.status(),
                symbol
            )));
        }

        let body = resp
            .json::<GoldApiPrice>()
            .await
            .map_err(|e| SpotProviderError::Parse(e.to_string()))?;

        body.price
            .filter(|p| p.is_finite())
            .ok_or_else(|| SpotProviderError::BadResponse(format!("{} upstream invalid price", symbol)))
    }
}

impl Default for GoldApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpotProvider for GoldApiProvider {
    async fn fetch_spot(&self) -> Result<SpotPrices, SpotProviderError> {
        let gold_usd_oz = self.fetch_symbol("XAU").await?;
        let silver_usd_oz = self.fetch_symbol("XAG").await?;

        Ok(SpotPrices { gold_usd_oz, silver_usd_oz })
    }
}
