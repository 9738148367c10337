use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use goldwise_backend::external::{
    ErApiFxProvider, ExchangerateHostFxProvider, FxFallbackResolver, FxProvider, GoldApiProvider,
};
use goldwise_backend::logging::{init_logging, LoggingConfig};
use goldwise_backend::services::calibration::MarketState;
use goldwise_backend::services::news_service::NewsService;
use goldwise_backend::services::quote_service::QuoteService;
use goldwise_backend::state::AppState;
use goldwise_backend::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging(LoggingConfig::from_env());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5050);

    let fx_providers: Vec<Box<dyn FxProvider>> = vec![
        Box::new(ErApiFxProvider::new()),
        Box::new(ExchangerateHostFxProvider::new()),
    ];

    let market = Arc::new(MarketState::default());
    let quotes = Arc::new(QuoteService::new(
        Arc::new(GoldApiProvider::new()),
        FxFallbackResolver::new(fx_providers),
        market.clone(),
    ));
    let news = Arc::new(NewsService::new());

    let state = AppState { market, quotes, news };
    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 GoldWise backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
