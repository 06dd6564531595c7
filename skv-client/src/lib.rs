//! # Sharded Cache Client
//!
//! Async client that presents several cache shards as one logical keyspace.
//! Every key-scoped operation is routed to exactly one backend by a CRC-32
//! hash of the key; listings fan out to all backends and merge.

mod client;
mod connection;
mod shard;

pub use client::{CacheClient, ClientError, ClientResult};
pub use connection::Connection;
pub use shard::ShardSet;
