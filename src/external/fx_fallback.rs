use tracing::warn;

use crate::external::fx_provider::FxProvider;

/// Static FX rate used when every provider is down.
pub const DEFAULT_USD_TO_INR: f64 = 83.0;

/// Tries an ordered list of FX providers for the same logical rate and
/// returns the first finite result, else the static default. Total function:
/// never raises to its caller.
pub struct FxFallbackResolver {
    providers: Vec<Box<dyn FxProvider>>,
    default_rate: f64,
}

impl FxFallbackResolver {
    pub fn new(providers: Vec<Box<dyn FxProvider>>) -> Self {
        Self { providers, default_rate: DEFAULT_USD_TO_INR }
    }

    pub fn with_default_rate(mut self, default_rate: f64) -> Self {
        self.default_rate = default_rate;
        self
    }

    pub async fn resolve(&self) -> f64 {
        for provider in &self.providers {
            match provider.fetch_usd_to_inr().await {
                Ok(rate) if rate.is_finite() => return rate,
                Ok(rate) => {
                    warn!("FX provider {} returned non-finite rate {}", provider.name(), rate);
                }
                Err(e) => {
                    warn!("FX provider {} failed: {}. Trying next.", provider.name(), e);
                }
            }
        }

        warn!("All FX providers failed, falling back to static rate {}", self.default_rate);
        self.default_rate
    }
}
