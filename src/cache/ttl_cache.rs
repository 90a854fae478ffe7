//! The cache-aside store.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::Serialize;

use crate::cache::lru::LruTracker;
use crate::observability::metrics;

/// Point-in-time cache counters, suitable for an admin/debug endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Entries removed by capacity overflow or TTL expiry.
    pub evictions: u64,
    /// Current number of stored entries.
    pub size: usize,
}

struct Inner<V> {
    entries: HashMap<String, V>,
    lru: LruTracker,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

/// Capacity-bounded cache with TTL expiry and LRU eviction.
///
/// Construct one at the composition root and clone the handle wherever it
/// is needed; clones share the same store. There is deliberately no global
/// instance.
///
/// Two documented limitations, both pinned by tests:
/// - `get_or_set` has no single-flight coordination; concurrent misses on
///   the same key may each invoke their factory.
/// - A TTL eviction scheduled by `set_with_ttl` fires at its original
///   deadline and deletes whatever value then occupies the key, even if the
///   entry was overwritten in the meantime.
pub struct TtlCache<V> {
    inner: Arc<Mutex<Inner<V>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + 'static,
{
    /// Create a cache holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                capacity: capacity.max(1),
                hits: 0,
                misses: 0,
                evictions: 0,
            })),
        }
    }

    /// Look up `key`, promoting it to most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.lock();
        match inner.entries.get(key).cloned() {
            Some(value) => {
                inner.lru.touch(key);
                inner.hits += 1;
                metrics::record_cache_hit();
                Some(value)
            }
            None => {
                inner.misses += 1;
                metrics::record_cache_miss();
                None
            }
        }
    }

    /// Store `value` under `key`, evicting the least recently touched entry
    /// if the capacity bound is exceeded.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut inner = self.lock();
        inner.entries.insert(key.clone(), value);
        inner.lru.touch(&key);

        if inner.entries.len() > inner.capacity {
            // The freshly touched key sits at the MRU end, so the popped
            // key is always a different, older one.
            if let Some(victim) = inner.lru.pop_lru() {
                inner.entries.remove(&victim);
                inner.evictions += 1;
                metrics::record_cache_eviction("capacity");
                tracing::debug!(key = %victim, "Evicted cache entry on capacity overflow");
            }
        }
    }

    /// Store `value` under `key` and schedule its eviction after `ttl`.
    ///
    /// Must be called within a tokio runtime. The eviction task holds only
    /// a weak reference; dropping the last cache handle cancels nothing but
    /// makes the timer a no-op.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        self.set(key.clone(), value);
        self.schedule_eviction(key, ttl);
    }

    /// Remove `key`; returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner.entries.remove(key).is_some();
        if removed {
            inner.lru.remove(key);
        }
        removed
    }

    /// Whether `key` holds a live entry. Does not promote recency.
    pub fn has(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.lru.clear();
    }

    /// Current number of stored entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Cache-aside read: return the cached value, or invoke `factory`,
    /// store its result, and return it.
    ///
    /// No single-flight: two tasks racing on the same absent key may both
    /// invoke their factory; the later `set` wins.
    pub async fn get_or_set<F, Fut>(&self, key: &str, factory: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = factory().await;
        self.set(key, value.clone());
        value
    }

    /// [`Self::get_or_set`] with a TTL applied when the factory result is
    /// stored. A hit schedules nothing.
    pub async fn get_or_set_with_ttl<F, Fut>(&self, key: &str, factory: F, ttl: Duration) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = factory().await;
        self.set_with_ttl(key, value.clone(), ttl);
        value
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            size: inner.entries.len(),
        }
    }

    fn schedule_eviction(&self, key: String, ttl: Duration) {
        let weak: Weak<Mutex<Inner<V>>> = Arc::downgrade(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.lock().expect("cache mutex poisoned");
            // Deletes whatever currently occupies the key, possibly a value
            // written after this eviction was scheduled.
            if inner.entries.remove(&key).is_some() {
                inner.lru.remove(&key);
                inner.evictions += 1;
                metrics::record_cache_eviction("ttl");
                tracing::debug!(key = %key, "Evicted cache entry on TTL expiry");
            }
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner<V>> {
        self.inner.lock().expect("cache mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_operations() {
        let cache = TtlCache::new(8);

        assert_eq!(cache.get("k"), None);
        cache.set("k", 1u32);
        assert!(cache.has("k"));
        assert_eq!(cache.get("k"), Some(1));

        assert!(cache.delete("k"));
        assert!(!cache.delete("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let cache = TtlCache::new(8);
        cache.set("a", 1u32);
        cache.set("b", 2u32);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(!cache.has("a"));
    }

    #[test]
    fn get_promotes_recency_for_eviction() {
        let cache = TtlCache::new(2);
        cache.set("a", 1u32);
        cache.set("b", 2u32);

        // Touch `a` so `b` becomes the LRU victim.
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c", 3u32);

        assert!(!cache.has("b"));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn overwrite_does_not_grow_the_cache() {
        let cache = TtlCache::new(2);
        cache.set("a", 1u32);
        cache.set("a", 2u32);
        cache.set("b", 3u32);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(2));
    }

    #[test]
    fn stats_track_hits_misses_evictions() {
        let cache = TtlCache::new(1);
        cache.get("absent");
        cache.set("a", 1u32);
        cache.get("a");
        cache.set("b", 2u32); // evicts "a"

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.size, 1);
    }
}
