//! Shared response envelope types for API handlers.
//!
//! Success responses are a flat `{ "message": ... }` object, optionally with
//! extra fields (see [`TransferAccepted`]). Errors use the `{ "error", "code" }`
//! shape produced by [`AppError`](crate::error::AppError).

use serde::Serialize;
use uuid::Uuid;

/// Plain `{ "message": "..." }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Acceptance of an image-transfer job.
///
/// The job has been started, not completed; its outcome is only visible in
/// the log stream. `job_id` correlates log lines with this request.
#[derive(Debug, Serialize)]
pub struct TransferAccepted {
    pub message: &'static str,
    pub job_id: Uuid,
}
