//! # Expiration Heap
//!
//! Binary min-heap of item references ordered by deadline. The heap keeps one
//! entry per item insertion; overwriting a key strands the old entry as a
//! tombstone, so consumers must verify the generation against the keyspace
//! before acting on a popped entry.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;

use crate::ttl::Deadline;

/// Reference to one inserted item: its deadline, key, and the generation
/// stamped at insertion. Ordering considers the deadline alone; ties between
/// equal deadlines are broken arbitrarily.
#[derive(Debug, Clone)]
pub(crate) struct HeapEntry {
    pub deadline: Deadline,
    pub key: Arc<str>,
    pub generation: u64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.deadline.cmp(&other.deadline)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap over `HeapEntry` deadlines.
#[derive(Debug, Default)]
pub(crate) struct ExpireHeap {
    entries: BinaryHeap<Reverse<HeapEntry>>,
}

impl ExpireHeap {
    pub fn push(&mut self, entry: HeapEntry) {
        self.entries.push(Reverse(entry));
    }

    /// Entry with the minimum deadline, if any.
    pub fn peek(&self) -> Option<&HeapEntry> {
        self.entries.peek().map(|Reverse(entry)| entry)
    }

    pub fn pop(&mut self) -> Option<HeapEntry> {
        self.entries.pop().map(|Reverse(entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn entry(deadline: Deadline, key: &str, generation: u64) -> HeapEntry {
        HeapEntry {
            deadline,
            key: Arc::from(key),
            generation,
        }
    }

    #[test]
    fn pops_in_deadline_order() {
        let now = Instant::now();
        let mut heap = ExpireHeap::default();
        heap.push(entry(Deadline::At(now + Duration::from_secs(3)), "c", 2));
        heap.push(entry(Deadline::At(now + Duration::from_secs(1)), "a", 0));
        heap.push(entry(Deadline::At(now + Duration::from_secs(2)), "b", 1));

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.peek().map(|e| e.key.as_ref()), Some("a"));
        assert_eq!(heap.pop().map(|e| e.generation), Some(0));
        assert_eq!(heap.pop().map(|e| e.generation), Some(1));
        assert_eq!(heap.pop().map(|e| e.generation), Some(2));
        assert!(heap.pop().is_none());
    }

    #[test]
    fn never_deadlines_sort_last() {
        let now = Instant::now();
        let mut heap = ExpireHeap::default();
        heap.push(entry(Deadline::Never, "forever", 0));
        heap.push(entry(Deadline::At(now + Duration::from_secs(1)), "soon", 1));

        assert_eq!(heap.pop().map(|e| e.key.as_ref().to_string()), Some("soon".into()));
        assert_eq!(heap.pop().map(|e| e.key.as_ref().to_string()), Some("forever".into()));
    }

    #[test]
    fn equal_deadlines_all_drain() {
        let at = Deadline::At(Instant::now() + Duration::from_secs(1));
        let mut heap = ExpireHeap::default();
        for generation in 0..4 {
            heap.push(entry(at, "k", generation));
        }

        let mut generations: Vec<u64> = Vec::new();
        while let Some(popped) = heap.pop() {
            generations.push(popped.generation);
        }
        generations.sort_unstable();
        assert_eq!(generations, vec![0, 1, 2, 3]);
    }
}
