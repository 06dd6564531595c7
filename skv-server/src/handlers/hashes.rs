//! `/hashes`: field operations on map values.

use axum::extract::{Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FieldQuery {
    key: String,
    #[serde(rename = "hashKey")]
    hash_key: String,
}

/// GET: the value of field `hashKey` in the map under `key`.
pub async fn get_field(
    State(state): State<AppState>,
    Query(params): Query<FieldQuery>,
) -> Result<String, ApiError> {
    if params.key.is_empty() || params.hash_key.is_empty() {
        return Err(ApiError::BadRequest);
    }
    Ok(state.cache.hget(&params.key, &params.hash_key)?)
}

#[derive(Debug, Deserialize)]
pub struct SetFieldQuery {
    key: String,
    #[serde(rename = "hashKey")]
    hash_key: String,
    value: String,
}

/// POST: set field `hashKey` to `value`, creating the map if absent.
pub async fn set_field(
    State(state): State<AppState>,
    Query(params): Query<SetFieldQuery>,
) -> Result<(), ApiError> {
    if params.key.is_empty() || params.hash_key.is_empty() || params.value.is_empty() {
        return Err(ApiError::BadRequest);
    }
    state
        .cache
        .hset(&params.key, params.hash_key, params.value)?;
    Ok(())
}
