//! # Shard Routing
//!
//! A key lives on exactly one backend for its lifetime: the CRC-32 (IEEE
//! polynomial) of the key bytes, modulo the connection count, picks the
//! shard. The mapping is stable across runs for a fixed connection order;
//! there is no rebalancing and no replica set.

use crate::client::{ClientError, ClientResult};
use crate::connection::Connection;

/// Ordered set of backend connections, fixed at construction.
#[derive(Debug, Clone)]
pub struct ShardSet {
    connections: Vec<Connection>,
}

impl ShardSet {
    pub fn new(connections: Vec<Connection>) -> ClientResult<Self> {
        if connections.is_empty() {
            return Err(ClientError::NoConnections);
        }
        Ok(ShardSet { connections })
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// All connections, in construction order. Used by fan-out operations.
    pub fn all(&self) -> &[Connection] {
        &self.connections
    }

    /// The connection owning `key`.
    pub fn shard_for(&self, key: &str) -> &Connection {
        let index = shard_index(key, self.connections.len());
        tracing::debug!(key, index, "routed key to shard");
        &self.connections[index]
    }
}

fn shard_index(key: &str, shards: usize) -> usize {
    crc32fast::hash(key.as_bytes()) as usize % shards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shard_set(count: usize) -> ShardSet {
        let connections = (0..count)
            .map(|index| Connection::new(format!("http://127.0.0.1:{}", 7000 + index)))
            .collect();
        ShardSet::new(connections).unwrap()
    }

    #[test]
    fn empty_set_is_rejected() {
        assert!(matches!(
            ShardSet::new(Vec::new()),
            Err(ClientError::NoConnections)
        ));
    }

    #[test]
    fn routing_is_deterministic() {
        let shards = shard_set(4);
        for key in ["alpha", "beta", "gamma", ""] {
            let first = shards.shard_for(key).base_url().to_string();
            for _ in 0..8 {
                assert_eq!(shards.shard_for(key).base_url(), first);
            }
        }
    }

    #[test]
    fn single_shard_owns_everything() {
        for key in ["a", "b", "c"] {
            assert_eq!(shard_index(key, 1), 0);
        }
    }

    #[test]
    fn many_keys_cover_all_shards() {
        let count = 4;
        let mut hits = vec![0usize; count];
        for index in 0..10_000 {
            hits[shard_index(&format!("key-{index}"), count)] += 1;
        }
        assert!(hits.iter().all(|&hit| hit > 0), "uncovered shard: {hits:?}");
    }
}
