use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FxProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// One upstream source for the USD→INR exchange rate. Implementations must
/// return a finite rate or an error; the fallback resolver handles the rest.
#[async_trait]
pub trait FxProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_usd_to_inr(&self) -> Result<f64, FxProviderError>;
}

// Both free FX APIs answer with the same { rates: { INR: .. } } shape.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: Option<HashMap<String, f64>>,
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (GoldWise FX)")
        .timeout(std::time::Duration::from_secs(15))
        .build()
        .expect("Failed to build HTTP client")
}

async fn fetch_inr_rate(
    client: &reqwest::Client,
    url: &str,
    provider: &str,
) -> Result<f64, FxProviderError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FxProviderError::Network(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(FxProviderError::BadResponse(format!(
            "Upstream {} from {}",
            resp.status(),
            provider
        )));
    }

    let body = resp
        .json::<RatesResponse>()
        .await
        .map_err(|e| FxProviderError::Parse(e.to_string()))?;

    body.rates
        .and_then(|rates| rates.get("INR").copied())
        .filter(|rate| rate.is_finite())
        .ok_or_else(|| FxProviderError::BadResponse(format!("{} invalid rate", provider)))
}

/// open.er-api.com, the primary free FX source.
pub struct ErApiFxProvider {
    client: reqwest::Client,
    url: String,
}

impl ErApiFxProvider {
    pub fn new() -> Self {
        Self::with_url("https://open.er-api.com/v6/latest/USD")
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { client: build_client(), url: url.into() }
    }
}

impl Default for ErApiFxProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FxProvider for ErApiFxProvider {
    fn name(&self) -> &'static str {
        "open.er-api"
    }

    async fn fetch_usd_to_inr(&self) -> Result<f64, FxProviderError> {
        fetch_inr_rate(&self.client, &self.url, self.name()).await
    }
}

/// exchangerate.host, the secondary free FX source.
pub struct ExchangerateHostFxProvider {
    client: reqwest::Client,
    url: String,
}

impl ExchangerateHostFxProvider {
    pub fn new() -> Self {
        Self::with_url("https://api.exchangerate.host/latest?base=USD&symbols=INR")
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self { client: build_client(), url: url.into() }
    }
}

impl Default for ExchangerateHostFxProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FxProvider for ExchangerateHostFxProvider {
    fn name(&self) -> &'static str {
        "exchangerate.host"
    }

    async fn fetch_usd_to_inr(&self) -> Result<f64, FxProviderError> {
        fetch_inr_rate(&self.client, &self.url, self.name()).await
    }
}
