//! Bounded TTL cache for catalog lookups.
//!
//! Shared, process-wide state guarded by a mutex. Entries expire after a
//! fixed time-to-live; when the cache is full, expired entries are dropped
//! first and the oldest entry is evicted if that is not enough. There is no
//! invalidation beyond expiry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use waymark_core::types::DbId;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// A bounded map from external id to a cached lookup result.
pub struct TtlCache<V> {
    inner: Mutex<HashMap<DbId, Entry<V>>>,
    ttl: Duration,
    capacity: usize,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache holding at most `capacity` entries for `ttl` each.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Look up a key. An expired entry is removed and reported as a miss.
    pub fn get(&self, key: DbId) -> Option<V> {
        let mut map = self.inner.lock().expect("catalog cache poisoned");
        match map.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                map.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Insert a value, evicting to stay within capacity.
    pub fn insert(&self, key: DbId, value: V) {
        let mut map = self.inner.lock().expect("catalog cache poisoned");

        if !map.contains_key(&key) && map.len() >= self.capacity {
            // Expired entries go first.
            let ttl = self.ttl;
            map.retain(|_, entry| entry.inserted_at.elapsed() < ttl);

            // Still full: drop the oldest entry.
            if map.len() >= self.capacity {
                if let Some(oldest) = map
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted_at)
                    .map(|(k, _)| *k)
                {
                    map.remove(&oldest);
                }
            }
        }

        map.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held (including not-yet-expired ones).
    pub fn len(&self) -> usize {
        self.inner.lock().expect("catalog cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
