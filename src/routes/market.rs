use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::LiveResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/live", get(get_live))
        .route("/calibrate", post(post_calibrate))
}

pub async fn get_live(State(state): State<AppState>) -> Result<Json<LiveResponse>, AppError> {
    info!("GET /api/live - serving quote");
    let quote = state.quotes.live_quote().await.map_err(|e| {
        error!("Failed to compute live quote: {}", e);
        e
    })?;
    Ok(Json(LiveResponse { ok: true, quote }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrateResponse {
    ok: bool,
    message: &'static str,
    premium_pct: f64,
}

pub async fn post_calibrate(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CalibrateResponse>, AppError> {
    // The field is pulled out of a raw JSON body so a missing or non-numeric
    // premiumPct yields the same validation error as an out-of-range one.
    let premium_pct = body
        .get("premiumPct")
        .and_then(Value::as_f64)
        .unwrap_or(f64::NAN);

    info!("POST /api/calibrate - premiumPct {}", premium_pct);
    let stored = state.market.set_premium(premium_pct)?;

    Ok(Json(CalibrateResponse { ok: true, message: "✅ Premium updated", premium_pct: stored }))
}
