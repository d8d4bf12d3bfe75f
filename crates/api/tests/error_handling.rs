//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server is
//! involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use xfer_api::error::AppError;
use xfer_core::error::CoreError;
use xfer_core::transfer::ExecutionError;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: CoreError::Validation maps to 400 with the message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("error parsing request: EOF".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "error parsing request: EOF");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Io maps to 500 with its context, not the OS error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn io_error_returns_500_with_context() {
    let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied: /var/log");
    let err = AppError::Core(CoreError::io("Failed to clear log file", source));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "LOG_IO_ERROR");
    assert_eq!(json["error"], "Failed to clear log file");
}

// ---------------------------------------------------------------------------
// Test: CoreError::Internal is sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("secret detail".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: transfer client construction failure maps to 500
// ---------------------------------------------------------------------------

#[tokio::test]
async fn transfer_client_error_returns_500() {
    let err = AppError::from(ExecutionError::Unavailable("no binary".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "TRANSFER_CLIENT_ERROR");
    assert_eq!(json["error"], "Failed to initialize transfer client");
}
