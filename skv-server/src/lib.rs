//! # HTTP Front-End
//!
//! Thin translation layer between the HTTP surface and the cache engine:
//! query parameters in, plain-text (or single-record CSV) bodies out, engine
//! errors mapped to status codes. Requests pass through an access-log layer
//! and an optional shared-secret check before reaching a handler.

pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use skv_engine::Cache;

/// State shared by every handler: the cache and the optional shared secret.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<Cache>,
    pub secret: Option<Arc<str>>,
}

/// Assembles the router for one cache shard.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/keys",
            get(handlers::keys::query)
                .post(handlers::keys::set)
                .patch(handlers::keys::update)
                .delete(handlers::keys::remove),
        )
        .route(
            "/lists",
            get(handlers::lists::range).post(handlers::lists::command),
        )
        .route(
            "/hashes",
            get(handlers::hashes::get_field).post(handlers::hashes::set_field),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_secret,
        ))
        .layer(axum::middleware::from_fn(middleware::access_log))
        .with_state(state)
}
