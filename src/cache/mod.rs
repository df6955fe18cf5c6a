//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, capacity eviction and
//! read-through helpers.

mod entry;
mod eviction;
mod registry;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::CacheEntry;
pub use registry::{CacheRegistry, API_CACHE, STATIC_CACHE, USER_DATA_CACHE};
pub use stats::{hit_rate, CacheStats, EntryStats};
pub use store::{CacheOptions, CacheStore, EvictFn};

// == Public Constants ==
/// Default lifetime of an entry
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default capacity of a store
pub const DEFAULT_MAX_SIZE: usize = 100;

/// Default period of the background expiry sweep
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest sweep period; shorter requests (including zero) are raised to it
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
