//! Shared-secret authentication middleware.
//!
//! Every endpoint requires an `x-api-key` header matching the configured
//! key: 401 when the header is absent, 403 when it mismatches.

use super::AppState;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Gate access to the endpoint before any handler runs.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "message": "API key is required"
            })),
        )
            .into_response(),
        Some(key) if key != state.api_key => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "success": false,
                "message": "Invalid API key"
            })),
        )
            .into_response(),
        Some(_) => next.run(request).await,
    }
}
