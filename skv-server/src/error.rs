//! Boundary error type mapping engine failures to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use skv_common::CacheError;

/// Errors a handler can produce. Engine errors pass through verbatim; the
/// boundary only adds the missing/invalid-parameter case.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or invalid request parameter")]
    BadRequest,

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST.into_response(),
            ApiError::Cache(err) if err.is_not_found() => StatusCode::NOT_FOUND.into_response(),
            ApiError::Cache(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
