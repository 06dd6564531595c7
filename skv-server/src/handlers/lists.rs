//! `/lists`: list operations dispatched on the `op` parameter.

use axum::extract::{Query, State};
use serde::Deserialize;

use skv_common::{csv, CacheError};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    op: String,
    key: String,
    from: i64,
    to: i64,
}

/// GET: `op=range` returns the CSV of elements at positions `[from, to]`.
pub async fn range(
    State(state): State<AppState>,
    Query(params): Query<RangeQuery>,
) -> Result<String, ApiError> {
    if params.op != "range" || params.key.is_empty() {
        return Err(ApiError::BadRequest);
    }
    let values = state.cache.lrange(&params.key, params.from, params.to)?;
    csv::write_record(&values).map_err(|err| {
        tracing::error!(%err, "failed to frame list range");
        ApiError::Cache(CacheError::Internal)
    })
}

#[derive(Debug, Deserialize)]
pub struct CommandQuery {
    op: String,
    key: String,
    value: Option<String>,
}

/// POST: pushes take a `value`; pops return the removed element.
pub async fn command(
    State(state): State<AppState>,
    Query(params): Query<CommandQuery>,
) -> Result<String, ApiError> {
    if params.key.is_empty() {
        return Err(ApiError::BadRequest);
    }
    match params.op.as_str() {
        "lpush" | "rpush" => {
            let value = params
                .value
                .filter(|value| !value.is_empty())
                .ok_or(ApiError::BadRequest)?;
            if params.op == "lpush" {
                state.cache.lpush(&params.key, value)?;
            } else {
                state.cache.rpush(&params.key, value)?;
            }
            Ok(String::new())
        }
        "lpop" => Ok(state.cache.lpop(&params.key)?),
        "rpop" => Ok(state.cache.rpop(&params.key)?),
        _ => Err(ApiError::BadRequest),
    }
}
