//! # Cache Engine
//!
//! In-memory, TTL-aware keyspace with three value shapes (scalar strings,
//! lists, and field maps), lazy expiration on read, and heap-driven eviction
//! on write plus a background sweep.

mod cache;
mod heap;
mod ttl;
mod value;

pub use cache::{Cache, DEFAULT_SWEEP_INTERVAL};
pub use ttl::{Deadline, Ttl};
pub use value::Value;
