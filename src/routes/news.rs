use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use axum::http::{HeaderMap, HeaderValue};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{NewsCategory, NewsPayload};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_news))
}

#[derive(Debug, Deserialize)]
pub struct NewsParams {
    category: Option<String>,
}

pub async fn get_news(
    Query(params): Query<NewsParams>,
    State(state): State<AppState>,
) -> Result<(HeaderMap, Json<NewsPayload>), AppError> {
    let category = NewsCategory::from_param(params.category.as_deref().unwrap_or("india"));
    info!("GET /api/news - category '{}'", category);

    let payload = state.news.category_news(category).await.map_err(|e| {
        error!("Failed to fetch news for '{}': {}", category, e);
        e
    })?;

    // Downstream proxies must not cache the feed on top of our own TTL.
    let mut headers = HeaderMap::new();
    headers.insert(
        CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, proxy-revalidate"),
    );
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));

    Ok((headers, Json(payload)))
}
