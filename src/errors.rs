use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Upstream error: {0}")]
    External(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::External(_) | AppError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Every failure leaves the server as the same JSON envelope the
        // frontend expects: { ok: false, error }.
        let body = Json(json!({ "ok": false, "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}
