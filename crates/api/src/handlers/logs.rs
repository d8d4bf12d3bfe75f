use axum::extract::State;
use axum::Json;

use crate::error::AppResult;
use crate::response::MessageResponse;
use crate::state::AppState;

/// POST /clear-log
///
/// Truncates the log file and signals every active tail stream to reset.
/// Tail connections stay open.
pub async fn clear_log(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    state.truncation.clear_log().await?;

    Ok(Json(MessageResponse {
        message: "Log file cleared successfully",
    }))
}
