use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use xfer_core::error::CoreError;
use xfer_core::transfer::ExecutionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`ExecutionError`] for transfer
/// client construction failures.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `xfer_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The transfer client could not be constructed.
    #[error("Transfer client error: {0}")]
    TransferClient(#[from] ExecutionError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Io { context, source } => {
                    tracing::error!(error = %source, context, "Log file I/O error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "LOG_IO_ERROR",
                        (*context).to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Transfer client construction ---
            AppError::TransferClient(err) => {
                tracing::error!(error = %err, "Failed to initialize transfer client");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TRANSFER_CLIENT_ERROR",
                    "Failed to initialize transfer client".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
