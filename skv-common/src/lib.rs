//! Shared types for the ShardKV cache: error kinds used across the engine,
//! server, and client, and the CSV record framing spoken on the wire.

pub mod csv;
mod error;

pub use error::{CacheError, CacheResult};
