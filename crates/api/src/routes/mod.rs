pub mod assets;
pub mod health;
pub mod logs;
pub mod transfer;

use axum::Router;

use crate::state::AppState;

/// Build the gateway route tree (everything except static assets).
///
/// ```text
/// /health                   GET   service health
/// /image-transfer           POST  dispatch a transfer job
/// /ws/logs                  GET   WebSocket log tail
/// /clear-log                POST  truncate the log file
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(transfer::router())
        .merge(logs::router())
}
