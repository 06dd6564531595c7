//! # Typed Client API
//!
//! Facade over the shard set: each operation builds the request URL, selects
//! the owning backend, issues the HTTP call, and interprets the status code.
//! Responses are never retried; failures surface to the caller as-is.

use reqwest::Method;
use thiserror::Error;

use skv_common::csv;

use crate::connection::Connection;
use crate::shard::ShardSet;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the sharded client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend reported 404: key (or hash field) absent or expired.
    #[error("key not found")]
    KeyNotFound,

    /// The backend reported 500.
    #[error("server error")]
    ServerError,

    /// The backend reported a status outside the contract.
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 body could not be decoded as a CSV record.
    #[error("malformed response body: {0}")]
    Decode(#[from] csv::Error),

    /// The client was built with an empty connection list.
    #[error("client requires at least one connection")]
    NoConnections,
}

/// Sharded cache client over a fixed set of backends.
#[derive(Debug, Clone)]
pub struct CacheClient {
    shards: ShardSet,
    http: reqwest::Client,
}

impl CacheClient {
    pub fn new(connections: Vec<Connection>) -> ClientResult<Self> {
        Ok(CacheClient {
            shards: ShardSet::new(connections)?,
            http: reqwest::Client::new(),
        })
    }

    /// Stores a scalar with a ttl in whole seconds.
    pub async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> ClientResult<()> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::POST, "/keys")
            .query(&[("key", key), ("value", value), ("ttl", &ttl_secs.to_string())])
            .send()
            .await?;
        expect_ok(response).await.map(drop)
    }

    /// Fetches the scalar stored under `key`.
    pub async fn get(&self, key: &str) -> ClientResult<String> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::GET, "/keys")
            .query(&[("key", key)])
            .send()
            .await?;
        expect_ok(response).await
    }

    /// Replaces the value under `key`, keeping its stored ttl.
    pub async fn update(&self, key: &str, value: &str) -> ClientResult<()> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::PATCH, "/keys")
            .query(&[("key", key), ("value", value)])
            .send()
            .await?;
        expect_ok(response).await.map(drop)
    }

    /// Replaces both the value and the ttl under `key`.
    pub async fn update_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl_secs: u64,
    ) -> ClientResult<()> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::PATCH, "/keys")
            .query(&[("key", key), ("value", value), ("ttl", &ttl_secs.to_string())])
            .send()
            .await?;
        expect_ok(response).await.map(drop)
    }

    /// Deletes `key` of any shape.
    pub async fn delete(&self, key: &str) -> ClientResult<()> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::DELETE, "/keys")
            .query(&[("key", key)])
            .send()
            .await?;
        expect_ok(response).await.map(drop)
    }

    /// Lists every live key across all shards.
    ///
    /// Fans out one GET per connection, waits for all of them, and merges the
    /// CSV-parsed lists; any failing connection fails the whole call with the
    /// first observed error.
    pub async fn keys(&self) -> ClientResult<Vec<String>> {
        let requests = self.shards.all().iter().map(|connection| {
            let builder = connection.request(&self.http, Method::GET, "/keys");
            async move { expect_ok(builder.send().await?).await }
        });

        let mut keys = Vec::new();
        for body in futures::future::join_all(requests).await {
            keys.extend(csv::read_record(&body?)?);
        }
        Ok(keys)
    }

    /// Appends at the back of the list under `key`.
    pub async fn lpush(&self, key: &str, value: &str) -> ClientResult<()> {
        self.list_push(key, value, "lpush").await
    }

    /// Appends at the front of the list under `key`.
    pub async fn rpush(&self, key: &str, value: &str) -> ClientResult<()> {
        self.list_push(key, value, "rpush").await
    }

    /// Removes and returns the front element of the list under `key`.
    pub async fn lpop(&self, key: &str) -> ClientResult<String> {
        self.list_pop(key, "lpop").await
    }

    /// Removes and returns the back element of the list under `key`.
    pub async fn rpop(&self, key: &str) -> ClientResult<String> {
        self.list_pop(key, "rpop").await
    }

    /// Fetches the elements at front-ordered positions in `[from, to]`.
    pub async fn lrange(&self, key: &str, from: i64, to: i64) -> ClientResult<Vec<String>> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::GET, "/lists")
            .query(&[
                ("op", "range"),
                ("key", key),
                ("from", &from.to_string()),
                ("to", &to.to_string()),
            ])
            .send()
            .await?;
        let body = expect_ok(response).await?;
        Ok(csv::read_record(&body)?)
    }

    /// Sets `field` in the map under `key`.
    pub async fn hset(&self, key: &str, field: &str, value: &str) -> ClientResult<()> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::POST, "/hashes")
            .query(&[("key", key), ("hashKey", field), ("value", value)])
            .send()
            .await?;
        expect_ok(response).await.map(drop)
    }

    /// Fetches `field` from the map under `key`.
    pub async fn hget(&self, key: &str, field: &str) -> ClientResult<String> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::GET, "/hashes")
            .query(&[("key", key), ("hashKey", field)])
            .send()
            .await?;
        expect_ok(response).await
    }

    async fn list_push(&self, key: &str, value: &str, op: &str) -> ClientResult<()> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::POST, "/lists")
            .query(&[("op", op), ("key", key), ("value", value)])
            .send()
            .await?;
        expect_ok(response).await.map(drop)
    }

    async fn list_pop(&self, key: &str, op: &str) -> ClientResult<String> {
        let response = self
            .shards
            .shard_for(key)
            .request(&self.http, Method::POST, "/lists")
            .query(&[("op", op), ("key", key)])
            .send()
            .await?;
        expect_ok(response).await
    }
}

/// Maps the response status to the client contract and returns the body on
/// success: 200 → body, 404 → `KeyNotFound`, 500 → `ServerError`, anything
/// else → `UnexpectedStatus`.
async fn expect_ok(response: reqwest::Response) -> ClientResult<String> {
    match response.status().as_u16() {
        200 => Ok(response.text().await?),
        404 => Err(ClientError::KeyNotFound),
        500 => Err(ClientError::ServerError),
        code => Err(ClientError::UnexpectedStatus(code)),
    }
}
