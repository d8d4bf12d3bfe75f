use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use xfer_core::job::JobRequest;

use crate::error::AppResult;
use crate::response::TransferAccepted;
use crate::state::AppState;

/// POST /image-transfer
///
/// Validates the body, starts the transfer in the background and returns
/// immediately. A 200 means the job was accepted, not that it succeeded;
/// the outcome only appears in `/ws/logs`.
pub async fn create_transfer(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<TransferAccepted>> {
    let request = JobRequest::from_json(&body)?;
    let accepted = state.dispatcher.dispatch(request)?;

    Ok(Json(TransferAccepted {
        message: "Image transfer accepted",
        job_id: accepted.job_id,
    }))
}
