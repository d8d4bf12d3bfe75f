//! Optional HTTP Basic authentication.
//!
//! When [`ServerConfig::basic_auth`](crate::config::ServerConfig) is set,
//! every route (including the WebSocket upgrade) requires matching
//! credentials. Failures get a 401 carrying a `WWW-Authenticate` challenge.

use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::config::BasicAuthConfig;
use crate::state::AppState;

const CHALLENGE: &str = "Basic realm=\"Authorization Required\"";

/// Reject requests whose `Authorization` header does not carry the
/// configured credentials. A no-op when Basic auth is not configured.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.basic_auth.as_ref() else {
        return next.run(request).await;
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if header.is_some_and(|h| credentials_match(h, expected)) {
        next.run(request).await
    } else {
        tracing::debug!(path = %request.uri().path(), "Rejected request without valid Basic credentials");
        unauthorized()
    }
}

/// Compare an `Authorization: Basic ...` header value with `expected`.
///
/// Username and password bytes are compared in constant time.
fn credentials_match(header: &str, expected: &BasicAuthConfig) -> bool {
    let Some(encoded) = header.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((user, pass)) = decoded.split_once(':') else {
        return false;
    };
    let user_ok = user.as_bytes().ct_eq(expected.username.as_bytes());
    let pass_ok = pass.as_bytes().ct_eq(expected.password.as_bytes());
    bool::from(user_ok & pass_ok)
}

fn unauthorized() -> Response {
    let body = json!({
        "error": "Authorization required",
        "code": "UNAUTHORIZED",
    });
    let mut response = (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response();
    response
        .headers_mut()
        .insert(WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}
