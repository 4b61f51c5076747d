use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parcel_types::ContentId;
use serde_json::Value;
use tracing::debug;

/// Resolved payloads keyed by CID.
///
/// Content under a CID never changes, so concurrent inserts for the same key
/// always carry the same value and need no coordination beyond the map's own
/// sharding. When a capacity is set, the oldest entries are evicted in a
/// batch once it is reached.
#[derive(Debug, Default)]
pub struct FetchCache {
    entries: DashMap<ContentId, CacheEntry>,
    /// Maximum entries; 0 is unbounded.
    capacity: usize,
    sequence: AtomicU64,
    evictions: AtomicU64,
}

#[derive(Debug)]
struct CacheEntry {
    payload: Arc<Value>,
    inserted: u64,
}

impl FetchCache {
    /// An unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` payloads (0 is unbounded).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    pub fn get(&self, cid: &ContentId) -> Option<Arc<Value>> {
        self.entries.get(cid).map(|entry| Arc::clone(&entry.payload))
    }

    pub fn insert(&self, cid: ContentId, payload: Arc<Value>) {
        if !self.entries.contains_key(&cid) {
            self.evict_until_fits();
        }
        let inserted = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(cid, CacheEntry { payload, inserted });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries dropped to stay within capacity since creation.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Make room for one entry, freeing a tenth of the capacity at once so a
    /// full cache does not sort on every insert.
    fn evict_until_fits(&self) {
        if self.capacity == 0 || self.entries.len() < self.capacity {
            return;
        }
        let target = self.capacity - (self.capacity / 10).max(1);

        let mut oldest: Vec<(ContentId, u64)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.inserted))
            .collect();
        oldest.sort_by_key(|(_, inserted)| *inserted);

        let excess = oldest.len().saturating_sub(target);
        let mut freed = 0u64;
        for (cid, _) in oldest.into_iter().take(excess) {
            if self.entries.remove(&cid).is_some() {
                freed += 1;
            }
        }
        self.evictions.fetch_add(freed, Ordering::Relaxed);
        debug!(freed, capacity = self.capacity, "evicted cached payloads");
    }
}
