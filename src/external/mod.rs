pub mod fx_fallback;
pub mod fx_provider;
pub mod gold_api;
pub mod spot_provider;

pub use fx_fallback::{FxFallbackResolver, DEFAULT_USD_TO_INR};
pub use fx_provider::{ErApiFxProvider, ExchangerateHostFxProvider, FxProvider, FxProviderError};
pub use gold_api::GoldApiProvider;
pub use spot_provider::{SpotPrices, SpotProvider, SpotProviderError};
