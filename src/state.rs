use std::sync::Arc;

use crate::services::calibration::MarketState;
use crate::services::news_service::NewsService;
use crate::services::quote_service::QuoteService;

#[derive(Clone)]
pub struct AppState {
    pub market: Arc<MarketState>,
    pub quotes: Arc<QuoteService>,
    pub news: Arc<NewsService>,
}
