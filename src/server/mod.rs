//! HTTP boundary over the query engine.
//!
//! Thin collaborators only: request-body validation, status mapping, and
//! the shared-secret check live here; all query semantics stay in the
//! engine. 400 covers user-input and translation errors, 500 execution
//! faults.

pub mod auth;

use crate::config::Config;
use crate::engine::{FaultKind, QueryEngine};
use crate::store::TableStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{middleware, Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
    pub api_key: String,
}

/// Request body for all query endpoints.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/query", post(handle_query))
        .route("/api/explain", post(explain_query))
        .route("/api/validate", post(validate_query))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server until shutdown.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(TableStore::seeded());
    let engine = Arc::new(QueryEngine::new(store)?);
    let state = AppState {
        engine,
        api_key: config.api_key.clone(),
    };

    let app = router(state);
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("askdb listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn missing_query() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "message": "Query is required"
        })),
    )
}

async fn handle_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    if request.query.trim().is_empty() {
        return missing_query().into_response();
    }

    let response = state.engine.handle_query(&request.query);
    let status = match response.fault {
        None => StatusCode::OK,
        Some(FaultKind::Translation) => StatusCode::BAD_REQUEST,
        Some(FaultKind::Execution) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(response)).into_response()
}

async fn explain_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    if request.query.trim().is_empty() {
        return missing_query().into_response();
    }
    Json(state.engine.explain_query(&request.query)).into_response()
}

async fn validate_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    if request.query.trim().is_empty() {
        return missing_query().into_response();
    }
    Json(state.engine.validate_query(&request.query)).into_response()
}
