//! # Cache Core
//!
//! Single keyspace mapping string keys to typed items with per-key
//! expiration, guarded by one reader/writer lock together with the
//! expiration heap.
//!
//! ## Usage
//!
//! - Use `Cache::new()` for a cache swept in the background every second.
//! - Use `Cache::with_sweep_interval` to tune the sweep cadence.
//! - Call `close()` (or drop the cache) to stop and join the sweeper.
//!
//! ## Design Principles
//!
//! 1. **Cheap Reads**: readers take shared mode and never mutate; an expired
//!    item is reported absent without being touched.
//! 2. **Writers Sweep First**: every exclusive acquisition drains expired
//!    heap roots before mutating, so writers observe a clean keyspace.
//! 3. **Tombstone Tolerance**: overwrites push a fresh heap entry instead of
//!    re-keying the heap; stale entries are detected by generation and
//!    discarded during the sweep.
//! 4. **Arc-Shared Keys**: the map and heap share one `Arc<str>` per key to
//!    avoid duplicate allocations.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use ahash::RandomState;
use hashbrown::HashMap;
use parking_lot::{Condvar, Mutex, RwLock};

use skv_common::{CacheError, CacheResult};

use crate::heap::{ExpireHeap, HeapEntry};
use crate::ttl::{Deadline, Ttl};
use crate::value::Value;

/// Default cadence of the background sweep.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// One stored record: typed value, relative ttl, absolute deadline, and the
/// generation stamped at insertion. The generation identifies this exact
/// occupant of the key so the sweep can tell live entries from tombstones.
#[derive(Debug)]
struct Item {
    value: Value,
    ttl: Ttl,
    expires_at: Deadline,
    generation: u64,
}

impl Item {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_past(now)
    }
}

/// Keyspace and heap, mutated together under the cache lock.
#[derive(Debug)]
struct CacheInner {
    items: HashMap<Arc<str>, Item, RandomState>,
    heap: ExpireHeap,
    next_generation: u64,
}

impl CacheInner {
    fn new() -> Self {
        CacheInner {
            items: HashMap::with_hasher(RandomState::new()),
            heap: ExpireHeap::default(),
            next_generation: 0,
        }
    }

    /// Looks up a key, treating an expired occupant as absent.
    fn live(&self, key: &str, now: Instant) -> Option<&Item> {
        self.items.get(key).filter(|item| !item.is_expired(now))
    }

    /// Replaces the occupant of `key` wholesale and records the new entry in
    /// the heap. Any previous heap entry for the key becomes a tombstone.
    fn insert(&mut self, key: &str, value: Value, ttl: Ttl, now: Instant) {
        let generation = self.next_generation;
        self.next_generation += 1;

        let deadline = ttl.deadline_from(now);
        let key: Arc<str> = Arc::from(key);
        self.heap.push(HeapEntry {
            deadline,
            key: Arc::clone(&key),
            generation,
        });
        self.items.insert(
            key,
            Item {
                value,
                ttl,
                expires_at: deadline,
                generation,
            },
        );
    }

    /// Drains expired heap roots. A popped entry removes its key only when
    /// the keyspace still holds the same generation; anything else is a
    /// tombstone left behind by an overwrite and is dropped silently.
    fn sweep(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some(root) = self.heap.peek() {
            if !root.deadline.is_past(now) {
                break;
            }
            let entry = match self.heap.pop() {
                Some(entry) => entry,
                None => break,
            };

            let is_current = self
                .items
                .get(entry.key.as_ref())
                .map(|item| item.generation == entry.generation)
                .unwrap_or(false);
            if is_current {
                self.items.remove(entry.key.as_ref());
                removed += 1;
            }
        }
        removed
    }
}

/// Stop flag plus condvar so the sweeper observes shutdown within one tick.
#[derive(Debug, Default)]
struct SweepSignal {
    stop: Mutex<bool>,
    wake: Condvar,
}

/// Background sweeper thread handle. Stopping signals the thread and joins
/// it; the cache cannot be finalized with the sweeper still running.
#[derive(Debug)]
struct Sweeper {
    signal: Arc<SweepSignal>,
    join: Option<JoinHandle<()>>,
}

impl Sweeper {
    fn spawn(shared: Arc<RwLock<CacheInner>>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            Duration::from_millis(1)
        } else {
            interval
        };

        let signal = Arc::new(SweepSignal::default());
        let thread_signal = Arc::clone(&signal);

        let join = std::thread::spawn(move || loop {
            {
                let mut stop = thread_signal.stop.lock();
                if *stop {
                    return;
                }
                let _ = thread_signal.wake.wait_for(&mut stop, interval);
                if *stop {
                    return;
                }
            }

            let (removed, backlog) = {
                let mut inner = shared.write();
                let removed = inner.sweep(Instant::now());
                (removed, inner.heap.len())
            };
            if removed > 0 {
                tracing::debug!(removed, backlog, "swept expired items");
            }
        });

        Sweeper {
            signal,
            join: Some(join),
        }
    }

    fn stop(&mut self) {
        *self.signal.stop.lock() = true;
        self.signal.wake.notify_one();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// TTL-aware key-value cache over scalar, list, and map values.
#[derive(Debug)]
pub struct Cache {
    shared: Arc<RwLock<CacheInner>>,
    sweeper: Option<Sweeper>,
}

impl Cache {
    /// Creates a cache swept in the background at the default interval.
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Creates a cache with a caller-chosen sweep cadence.
    pub fn with_sweep_interval(interval: Duration) -> Self {
        let shared = Arc::new(RwLock::new(CacheInner::new()));
        let sweeper = Sweeper::spawn(Arc::clone(&shared), interval);
        Cache {
            shared,
            sweeper: Some(sweeper),
        }
    }

    /// Stops and joins the background sweeper. The cache stays usable; only
    /// lazy and opportunistic expiration remain. Also runs on drop.
    pub fn close(&mut self) {
        if let Some(mut sweeper) = self.sweeper.take() {
            sweeper.stop();
        }
    }

    /// Stores a scalar under `key`, replacing any previous occupant
    /// regardless of shape.
    pub fn set(&self, key: &str, value: impl Into<String>, ttl: Ttl) {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);
        inner.insert(key, Value::Scalar(value.into()), ttl, now);
    }

    /// Returns the scalar stored under `key`.
    pub fn get(&self, key: &str) -> CacheResult<String> {
        let now = Instant::now();
        let inner = self.shared.read();
        let item = inner.live(key, now).ok_or(CacheError::KeyNotFound)?;
        item.value
            .as_scalar()
            .map(str::to_string)
            .ok_or(CacheError::WrongType)
    }

    /// Returns the ttl recorded at the item's last set, for any shape.
    pub fn ttl(&self, key: &str) -> CacheResult<Ttl> {
        let now = Instant::now();
        let inner = self.shared.read();
        inner
            .live(key, now)
            .map(|item| item.ttl)
            .ok_or(CacheError::KeyNotFound)
    }

    /// Replaces the scalar under `key`, keeping its stored ttl. The deadline
    /// restarts from now, so updating extends the item's life.
    pub fn update(&self, key: &str, value: impl Into<String>) -> CacheResult<()> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);

        let ttl = {
            let item = inner.live(key, now).ok_or(CacheError::KeyNotFound)?;
            if item.value.as_scalar().is_none() {
                return Err(CacheError::WrongType);
            }
            item.ttl
        };
        inner.insert(key, Value::Scalar(value.into()), ttl, now);
        Ok(())
    }

    /// Replaces both the scalar and its ttl.
    pub fn update_with_ttl(
        &self,
        key: &str,
        value: impl Into<String>,
        ttl: Ttl,
    ) -> CacheResult<()> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);

        {
            let item = inner.live(key, now).ok_or(CacheError::KeyNotFound)?;
            if item.value.as_scalar().is_none() {
                return Err(CacheError::WrongType);
            }
        }
        inner.insert(key, Value::Scalar(value.into()), ttl, now);
        Ok(())
    }

    /// Removes `key` of any shape.
    pub fn del(&self, key: &str) -> CacheResult<()> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);
        inner
            .items
            .remove(key)
            .map(|_| ())
            .ok_or(CacheError::KeyNotFound)
    }

    /// Snapshot of all live keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);
        inner.items.keys().map(|key| key.to_string()).collect()
    }

    /// Number of live items.
    pub fn count(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);
        inner.items.len()
    }

    /// Appends at the back of the list under `key`, creating the list with
    /// infinite ttl when the key is absent.
    pub fn lpush(&self, key: &str, value: impl Into<String>) -> CacheResult<()> {
        self.push(key, value.into(), ListEnd::Back)
    }

    /// Appends at the front of the list under `key`, creating it if absent.
    pub fn rpush(&self, key: &str, value: impl Into<String>) -> CacheResult<()> {
        self.push(key, value.into(), ListEnd::Front)
    }

    /// Removes and returns the front element of the list under `key`.
    pub fn lpop(&self, key: &str) -> CacheResult<String> {
        self.pop(key, ListEnd::Front)
    }

    /// Removes and returns the back element of the list under `key`.
    pub fn rpop(&self, key: &str) -> CacheResult<String> {
        self.pop(key, ListEnd::Back)
    }

    /// Collects the elements at front-ordered positions in `[from, to]`,
    /// both bounds inclusive. An inverted or out-of-range window yields an
    /// empty sequence.
    pub fn lrange(&self, key: &str, from: i64, to: i64) -> CacheResult<Vec<String>> {
        let now = Instant::now();
        let inner = self.shared.read();
        let item = inner.live(key, now).ok_or(CacheError::KeyNotFound)?;
        let list = item.value.as_list().ok_or(CacheError::WrongType)?;

        if to < from {
            return Ok(Vec::new());
        }
        Ok(list
            .iter()
            .enumerate()
            .filter(|(position, _)| {
                let position = *position as i64;
                position >= from && position <= to
            })
            .map(|(_, value)| value.clone())
            .collect())
    }

    /// Sets `field` in the map under `key`, creating the map with infinite
    /// ttl when the key is absent.
    pub fn hset(
        &self,
        key: &str,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> CacheResult<()> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);

        match inner.items.get_mut(key) {
            Some(item) => {
                let map = item.value.as_map_mut().ok_or(CacheError::WrongType)?;
                map.insert(field.into(), value.into());
                Ok(())
            }
            None => {
                let mut map = HashMap::new();
                map.insert(field.into(), value.into());
                inner.insert(key, Value::Map(map), Ttl::INFINITE, now);
                Ok(())
            }
        }
    }

    /// Returns the value of `field` in the map under `key`.
    pub fn hget(&self, key: &str, field: &str) -> CacheResult<String> {
        let now = Instant::now();
        let inner = self.shared.read();
        let item = inner.live(key, now).ok_or(CacheError::KeyNotFound)?;
        let map = item.value.as_map().ok_or(CacheError::WrongType)?;
        map.get(field)
            .cloned()
            .ok_or(CacheError::HashFieldNotFound)
    }

    fn push(&self, key: &str, value: String, end: ListEnd) -> CacheResult<()> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);

        match inner.items.get_mut(key) {
            Some(item) => {
                let list = item.value.as_list_mut().ok_or(CacheError::WrongType)?;
                match end {
                    ListEnd::Front => list.push_front(value),
                    ListEnd::Back => list.push_back(value),
                }
                Ok(())
            }
            None => {
                let mut list = VecDeque::new();
                list.push_back(value);
                inner.insert(key, Value::List(list), Ttl::INFINITE, now);
                Ok(())
            }
        }
    }

    fn pop(&self, key: &str, end: ListEnd) -> CacheResult<String> {
        let now = Instant::now();
        let mut inner = self.shared.write();
        inner.sweep(now);

        let item = inner.items.get_mut(key).ok_or(CacheError::KeyNotFound)?;
        let list = item.value.as_list_mut().ok_or(CacheError::WrongType)?;
        let value = match end {
            ListEnd::Front => list.pop_front(),
            ListEnd::Back => list.pop_back(),
        };
        // An emptied container is retained; popping it again finds no value.
        value.ok_or(CacheError::KeyNotFound)
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        self.close();
    }
}

/// Which end of a list a push or pop operates on.
#[derive(Debug, Clone, Copy)]
enum ListEnd {
    Front,
    Back,
}
