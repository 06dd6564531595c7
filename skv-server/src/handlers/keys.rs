//! `/keys`: scalar operations and the keyspace listing.

use axum::extract::{Query, State};
use serde::Deserialize;

use skv_common::{csv, CacheError};
use skv_engine::Ttl;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct KeysQuery {
    key: Option<String>,
}

/// GET: the value of `key`, or the CSV key listing when no key is given.
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<KeysQuery>,
) -> Result<String, ApiError> {
    match params.key {
        None => {
            let keys = state.cache.keys();
            csv::write_record(&keys).map_err(|err| {
                tracing::error!(%err, "failed to frame key listing");
                ApiError::Cache(CacheError::Internal)
            })
        }
        Some(key) if key.is_empty() => Err(ApiError::BadRequest),
        Some(key) => Ok(state.cache.get(&key)?),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetQuery {
    key: String,
    value: String,
    ttl: u64,
}

/// POST: store `value` under `key` for `ttl` seconds.
pub async fn set(
    State(state): State<AppState>,
    Query(params): Query<SetQuery>,
) -> Result<(), ApiError> {
    if params.key.is_empty() || params.value.is_empty() {
        return Err(ApiError::BadRequest);
    }
    state
        .cache
        .set(&params.key, params.value, Ttl::from_secs(params.ttl));
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    key: String,
    value: String,
    ttl: Option<u64>,
}

/// PATCH: replace the value, keeping the stored ttl unless a new one is
/// given.
pub async fn update(
    State(state): State<AppState>,
    Query(params): Query<UpdateQuery>,
) -> Result<(), ApiError> {
    if params.key.is_empty() || params.value.is_empty() {
        return Err(ApiError::BadRequest);
    }
    match params.ttl {
        Some(ttl) => {
            state
                .cache
                .update_with_ttl(&params.key, params.value, Ttl::from_secs(ttl))?
        }
        None => state.cache.update(&params.key, params.value)?,
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    key: String,
}

/// DELETE: remove `key` of any shape.
pub async fn remove(
    State(state): State<AppState>,
    Query(params): Query<DeleteQuery>,
) -> Result<(), ApiError> {
    if params.key.is_empty() {
        return Err(ApiError::BadRequest);
    }
    state.cache.del(&params.key)?;
    Ok(())
}
