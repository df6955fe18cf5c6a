//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with its value and access metadata.
///
/// `timestamp` is refreshed on every successful read, so it doubles as the
/// recency marker used for eviction.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// Last write or last successful read
    pub timestamp: Instant,
    /// Lifetime measured from `timestamp`
    pub ttl: Duration,
    /// Number of successful reads
    pub hits: u64,
    /// Store-wide access sequence, breaks ties between equal timestamps
    pub(crate) seq: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a fresh entry stamped at `now` with zero hits.
    pub fn new(data: T, ttl: Duration, now: Instant, seq: u64) -> Self {
        Self {
            data,
            timestamp: now,
            ttl,
            hits: 0,
            seq,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived its TTL at `now`.
    ///
    /// Boundary condition: an entry whose age equals its TTL exactly is still
    /// live; it expires once the age is strictly greater.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.age_at(now) > self.ttl
    }

    // == Age ==
    /// Time elapsed since the last write or read.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }

    // == Touch ==
    /// Records a successful read: bumps hits and restarts the TTL window.
    pub fn touch(&mut self, now: Instant, seq: u64) {
        self.hits += 1;
        self.timestamp = now;
        self.seq = seq;
    }
}
