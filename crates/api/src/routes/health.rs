use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the log file can be inspected.
    pub log_store_ok: bool,
}

/// GET /health -- returns service and log store health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let log_store_ok = state.log_store.size().await.is_ok();

    let status = if log_store_ok { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        log_store_ok,
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
