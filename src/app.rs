use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, market, news};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .nest("/api", market::router())
        .nest("/api/news", news::router())
        .merge(health::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
