//! Request decoration: URL-access logging and shared-secret authentication.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::AppState;

/// Compares the `Authorization` header against the configured shared secret
/// and rejects mismatches with 401. Pass-through when no secret is set.
pub async fn require_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(secret) = state.secret.as_deref() {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if presented != Some(secret) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }
    next.run(request).await
}

/// Logs method + host + URI for every request.
pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let uri = request.uri().clone();
    tracing::info!(%method, host, %uri, "request");
    next.run(request).await
}
