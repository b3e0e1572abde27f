//! Cache Module
//!
//! Provides an in-process key/value cache with per-entry TTL, used both for
//! the upstream access token and for shaped search/answer responses.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ExpiringCache;

// == Public Constants ==
/// Cache key for the upstream access token
pub const AUTH_TOKEN_KEY: &str = "auth_token";
