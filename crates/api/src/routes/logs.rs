use axum::routing::{get, post};
use axum::Router;

use crate::handlers::logs;
use crate::state::AppState;
use crate::ws;

/// Log tail and maintenance.
///
/// ```text
/// GET  /ws/logs             WebSocket tail of the log file
/// POST /clear-log           truncate the log file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ws/logs", get(ws::logs_ws_handler))
        .route("/clear-log", post(logs::clear_log))
}
