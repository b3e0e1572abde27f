//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single stored value together with the moment it was stored and its TTL.
///
/// Timestamps come from `tokio::time::Instant`, so a paused test runtime
/// controls both the age of an entry and the firing of its eviction timer.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was stored
    pub stored_at: Instant,
    /// How long the value stays live
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Age ==
    /// Returns how long the entry has been stored as of `now`.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry whose age equals its TTL is expired, so a
    /// read landing exactly on the expiration instant never sees the value.
    /// A zero TTL is therefore expired immediately.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) >= self.ttl
    }
}
