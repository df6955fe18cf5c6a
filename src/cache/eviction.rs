//! Eviction Policy Module
//!
//! Chooses which entries leave the map, either for capacity or for age.
//!
//! Victim selection is a linear scan for the least recently written-or-read
//! entry. Stores are sized in the tens to low hundreds, so no ordered index
//! is maintained alongside the map.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Select Victim ==
/// Returns the key with the smallest `(timestamp, seq)`, or None if empty.
pub fn select_victim<T>(entries: &HashMap<String, CacheEntry<T>>) -> Option<String> {
    entries
        .iter()
        .min_by_key(|(_, entry)| (entry.timestamp, entry.seq))
        .map(|(key, _)| key.clone())
}

// == Expired Keys ==
/// Collects every key whose entry has expired at `now`.
pub fn expired_keys<T>(entries: &HashMap<String, CacheEntry<T>>, now: Instant) -> Vec<String> {
    entries
        .iter()
        .filter(|(_, entry)| entry.is_expired_at(now))
        .map(|(key, _)| key.clone())
        .collect()
}
