//! Cache Store Module
//!
//! Process-local key/value store with per-entry TTL. Expiry is enforced twice:
//! a one-shot tokio task evicts each entry when its TTL elapses, and every
//! read re-checks the entry's age so an expired value is never returned even
//! if the timer has not run yet.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == Slot ==
/// An entry and its pending eviction, stored together so the two can never
/// drift apart.
struct Slot<V> {
    entry: CacheEntry<V>,
    /// Distinguishes this write from earlier writes to the same key
    generation: u64,
    /// Scheduled eviction, absent for zero TTLs or outside a tokio runtime
    eviction: Option<AbortHandle>,
}

impl<V> Slot<V> {
    fn cancel_eviction(&self) {
        if let Some(handle) = &self.eviction {
            handle.abort();
        }
    }
}

struct StoreInner<V> {
    slots: HashMap<String, Slot<V>>,
    next_generation: u64,
}

impl<V> StoreInner<V> {
    fn remove(&mut self, key: &str) -> bool {
        match self.slots.remove(key) {
            Some(slot) => {
                slot.cancel_eviction();
                true
            }
            None => false,
        }
    }
}

impl<V> Drop for StoreInner<V> {
    fn drop(&mut self) {
        for slot in self.slots.values() {
            slot.cancel_eviction();
        }
    }
}

// == Expiring Cache ==
/// Shared handle to a TTL cache. Clones refer to the same store.
///
/// All operations are synchronous and hold the lock only for the duration of
/// the call, so an eviction timer can never interleave with a `get`, `set` or
/// `delete` on the same key.
pub struct ExpiringCache<V> {
    inner: Arc<Mutex<StoreInner<V>>>,
}

impl<V> Clone for ExpiringCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> fmt::Debug for ExpiringCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("len", &self.lock().slots.len())
            .finish()
    }
}

impl<V: Clone + Send + 'static> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ExpiringCache<V> {
    fn lock(&self) -> MutexGuard<'_, StoreInner<V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone + Send + 'static> ExpiringCache<V> {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                slots: HashMap::new(),
                next_generation: 0,
            })),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_secs` seconds.
    ///
    /// Any pending eviction for an existing entry is cancelled before the new
    /// one is scheduled. A zero TTL stores an entry that is already expired.
    pub fn set(&self, key: impl Into<String>, value: V, ttl_secs: u64) {
        let key = key.into();
        let ttl = Duration::from_secs(ttl_secs);

        let mut inner = self.lock();
        inner.remove(&key);

        inner.next_generation += 1;
        let generation = inner.next_generation;

        let eviction = if ttl.is_zero() {
            None
        } else {
            schedule_eviction(Arc::downgrade(&self.inner), key.clone(), generation, ttl)
        };

        inner.slots.insert(
            key,
            Slot {
                entry: CacheEntry::new(value, ttl),
                generation,
                eviction,
            },
        );
    }

    // == Get ==
    /// Returns the value for `key`, or `None` if absent or expired.
    ///
    /// An expired entry found here is removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.lock();
        let now = Instant::now();

        let expired = inner
            .slots
            .get(key)
            .map(|slot| slot.entry.is_expired_at(now));
        match expired {
            Some(true) => {
                debug!(key = key, "Cache entry expired on read");
                inner.remove(key);
                None
            }
            Some(false) => inner.slots.get(key).map(|slot| slot.entry.value.clone()),
            None => None,
        }
    }

    // == Has ==
    /// Returns true if `key` holds a live entry. Same expiry rules as `get`.
    pub fn has(&self, key: &str) -> bool {
        let mut inner = self.lock();
        let now = Instant::now();

        match inner.slots.get(key).map(|slot| slot.entry.is_expired_at(now)) {
            Some(true) => {
                inner.remove(key);
                false
            }
            Some(false) => true,
            None => false,
        }
    }

    // == Delete ==
    /// Removes `key` and cancels its eviction. Returns whether it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key)
    }

    // == Clear ==
    /// Removes every entry and cancels every pending eviction.
    pub fn clear(&self) {
        let mut inner = self.lock();
        for (_, slot) in inner.slots.drain() {
            slot.cancel_eviction();
        }
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }
}

impl<V: Clone + Send + Serialize + 'static> ExpiringCache<V> {
    // == Stats ==
    /// Purges expired entries, then reports the remaining live ones.
    ///
    /// The memory figure is the serialized JSON size of the live values.
    pub fn stats(&self) -> CacheStats {
        let mut inner = self.lock();
        let now = Instant::now();

        let expired: Vec<String> = inner
            .slots
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            inner.remove(key);
        }
        if !expired.is_empty() {
            debug!("Stats scan purged {} expired entries", expired.len());
        }

        let keys = inner.slots.keys().cloned().collect();
        let approximate_memory_bytes = inner
            .slots
            .values()
            .map(|slot| {
                serde_json::to_vec(&slot.entry.value)
                    .map(|bytes| bytes.len())
                    .unwrap_or(0)
            })
            .sum();

        CacheStats::new(keys, approximate_memory_bytes)
    }
}

/// Spawns the one-shot eviction for a single write.
///
/// The task only removes the slot if it still carries the same generation, so
/// a timer that was already running when its key was overwritten cannot
/// delete the newer value. Returns `None` when no tokio runtime is available;
/// such entries rely on read-time expiry alone.
fn schedule_eviction<V: Send + 'static>(
    store: Weak<Mutex<StoreInner<V>>>,
    key: String,
    generation: u64,
    ttl: Duration,
) -> Option<AbortHandle> {
    let handle = Handle::try_current().ok()?;

    let task = handle.spawn(async move {
        tokio::time::sleep(ttl).await;

        let Some(store) = store.upgrade() else {
            return;
        };
        let mut inner = store.lock().unwrap_or_else(PoisonError::into_inner);
        let current = inner
            .slots
            .get(&key)
            .is_some_and(|slot| slot.generation == generation);
        if current {
            inner.slots.remove(&key);
            debug!(key = %key, "Evicted expired cache entry");
        }
    });

    Some(task.abort_handle())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[tokio::test(start_paused = true)]
    async fn test_set_and_get() {
        let cache = ExpiringCache::new();

        cache.set("key1", "value1".to_string(), 60);

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert!(cache.has("key1"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_nonexistent() {
        let cache: ExpiringCache<String> = ExpiringCache::new();

        assert_eq!(cache.get("missing"), None);
        assert!(!cache.has("missing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ExpiringCache::new();
        cache.set("key1", 1u32, 1);

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(cache.get("key1"), None);
        assert!(!cache.has("key1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_evicts_without_read() {
        let cache = ExpiringCache::new();
        cache.set("key1", 1u32, 1);

        // Auto-advance fires the 1s eviction before this sleep completes
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_cancels_previous_eviction() {
        let cache = ExpiringCache::new();
        cache.set("key1", "v1".to_string(), 1);
        cache.set("key1", "v2".to_string(), 100);

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(cache.get("key1"), Some("v2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delete_leaves_no_dangling_eviction() {
        let cache = ExpiringCache::new();
        cache.set("key1", "v1".to_string(), 1);

        assert!(cache.delete("key1"));
        assert!(!cache.delete("key1"));

        cache.set("key1", "v2".to_string(), 10);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(cache.get("key1"), Some("v2".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_leaves_no_dangling_eviction() {
        let cache = ExpiringCache::new();
        cache.set("a", 1u32, 1);
        cache.set("b", 2u32, 1);

        cache.clear();
        assert!(cache.is_empty());

        cache.set("a", 3u32, 10);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(cache.get("a"), Some(3));
        assert_eq!(cache.get("b"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_reports_live_entries() {
        let cache = ExpiringCache::new();
        cache.set("short", "abc".to_string(), 1);
        cache.set("long", "abc".to_string(), 60);

        tokio::time::advance(Duration::from_secs(2)).await;

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.keys, vec!["long"]);
        // "\"abc\"" serialized
        assert_eq!(stats.approximate_memory_bytes, 5);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_storage() {
        let cache = ExpiringCache::new();
        let other = cache.clone();

        cache.set("shared", 7u32, 30);

        assert_eq!(other.get("shared"), Some(7));
        assert!(other.delete("shared"));
        assert!(!cache.has("shared"));
    }

    #[test]
    fn test_zero_ttl_expires_on_next_read() {
        let cache = ExpiringCache::new();
        cache.set("key1", 1u32, 0);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lazy_expiry_without_runtime() {
        // No runtime, so no timer: only the read-time check can expire this
        let cache = ExpiringCache::new();
        cache.set("key1", "value".to_string(), 1);

        assert!(cache.has("key1"));
        sleep(Duration::from_millis(1100));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.len(), 0);
    }
}
