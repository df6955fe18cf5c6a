//! Cache Statistics Module
//!
//! Point-in-time snapshot of a store: size, capacity, per-entry hits and ages.

use std::collections::HashMap;

use serde::Serialize;
use tokio::time::Instant;

use crate::cache::CacheEntry;

// == Entry Stats ==
/// Per-entry line of a stats snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryStats {
    pub key: String,
    pub hits: u64,
    /// Milliseconds since the entry was last written or read
    pub age_ms: u64,
}

// == Cache Stats ==
/// Snapshot returned by `CacheStore::stats`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    /// Current number of entries (expired-but-unswept entries included)
    pub size: usize,
    /// Capacity bound of the store
    pub max_size: usize,
    /// Heuristic percentage, see [`hit_rate`]
    pub hit_rate: f64,
    /// Entries ordered by descending hits
    pub entries: Vec<EntryStats>,
}

impl CacheStats {
    // == Snapshot ==
    /// Builds a snapshot of `entries` as seen at `now`.
    pub fn snapshot<T>(entries: &HashMap<String, CacheEntry<T>>, max_size: usize, now: Instant) -> Self {
        let mut lines: Vec<EntryStats> = entries
            .iter()
            .map(|(key, entry)| EntryStats {
                key: key.clone(),
                hits: entry.hits,
                age_ms: entry.age_at(now).as_millis() as u64,
            })
            .collect();
        lines.sort_by(|a, b| b.hits.cmp(&a.hits).then_with(|| a.key.cmp(&b.key)));

        let total_hits: u64 = lines.iter().map(|line| line.hits).sum();

        Self {
            size: entries.len(),
            max_size,
            hit_rate: hit_rate(total_hits, entries.len()),
            entries: lines,
        }
    }

    /// Sum of hits over all entries in the snapshot.
    pub fn total_hits(&self) -> u64 {
        self.entries.iter().map(|line| line.hits).sum()
    }
}

// == Hit Rate ==
/// `total_hits / (total_hits + size) * 100`.
///
/// Misses are not tracked, so this counts each live entry as one "miss" (the
/// write that populated it). Returns 0.0 for an empty store.
pub fn hit_rate(total_hits: u64, size: usize) -> f64 {
    let denominator = total_hits + size as u64;
    if denominator == 0 {
        0.0
    } else {
        total_hits as f64 / denominator as f64 * 100.0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_hit_rate_empty() {
        assert_eq!(hit_rate(0, 0), 0.0);
    }

    #[test]
    fn test_hit_rate_no_hits() {
        assert_eq!(hit_rate(0, 4), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        // 3 hits over 1 entry -> 3 / 4
        assert_eq!(hit_rate(3, 1), 75.0);
    }

    #[test]
    fn test_snapshot_sorted_by_hits() {
        let now = Instant::now();
        let mut entries = HashMap::new();

        let mut popular = CacheEntry::new("p", Duration::from_secs(60), now, 0);
        popular.hits = 5;
        let mut middling = CacheEntry::new("m", Duration::from_secs(60), now, 1);
        middling.hits = 2;
        let cold = CacheEntry::new("c", Duration::from_secs(60), now, 2);

        entries.insert("cold".to_string(), cold);
        entries.insert("popular".to_string(), popular);
        entries.insert("middling".to_string(), middling);

        let stats = CacheStats::snapshot(&entries, 10, now + Duration::from_millis(250));

        let keys: Vec<&str> = stats.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["popular", "middling", "cold"]);
        assert_eq!(stats.size, 3);
        assert_eq!(stats.max_size, 10);
        assert_eq!(stats.total_hits(), 7);
        assert_eq!(stats.hit_rate, 70.0);
        assert!(stats.entries.iter().all(|e| e.age_ms == 250));
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = CacheStats::snapshot::<u8>(&HashMap::new(), 100, Instant::now());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], 0);
        assert_eq!(json["max_size"], 100);
        assert_eq!(json["hit_rate"], 0.0);
        assert!(json["entries"].as_array().unwrap().is_empty());
    }
}
