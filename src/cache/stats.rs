//! Cache Statistics Module
//!
//! Point-in-time snapshot of the live entries held by an `ExpiringCache`.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the live cache contents, taken after expired entries are purged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of live entries
    pub size: usize,
    /// Keys of the live entries, sorted
    pub keys: Vec<String>,
    /// Serialized size of the live values in bytes (an estimate, not heap usage)
    pub approximate_memory_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from the live keys and their estimated size.
    pub fn new(mut keys: Vec<String>, approximate_memory_bytes: usize) -> Self {
        keys.sort();
        Self {
            size: keys.len(),
            keys,
            approximate_memory_bytes,
        }
    }
}
