use axum::routing::post;
use axum::Router;

use crate::handlers::transfer;
use crate::state::AppState;

/// Job submission.
///
/// ```text
/// POST /image-transfer      dispatch a transfer job
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/image-transfer", post(transfer::create_transfer))
}
