//! Cache Store Module
//!
//! Maps request keys to decoded GET payloads with a fixed time-to-live.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Response cache keyed by request key.
///
/// Stale entries are never removed on read; they stay until overwritten by
/// a newer payload for the same key or dropped by `clear`.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-payload storage
    entries: HashMap<String, CacheEntry>,
    /// Lifetime of an entry
    ttl: Duration,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty CacheStore whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            stats: CacheStats::new(),
        }
    }

    /// Entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns the payload for `key` if it was stored less than TTL ago.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    /// Same as `get`, judged at an explicit instant.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Value> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh_at(now, self.ttl) => {
                self.stats.record_hit();
                Some(entry.payload.clone())
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Get Stale ==
    /// Returns the payload for `key` regardless of its age.
    ///
    /// Only used to soften a cancelled GET; does not touch hit/miss counters.
    pub fn get_stale(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    // == Put ==
    /// Stores `payload` under `key` stamped with the current time,
    /// overwriting any earlier entry.
    pub fn put(&mut self, key: String, payload: Value) {
        self.entries.insert(key, CacheEntry::new(payload));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear ==
    /// Removes every entry whose key contains `pattern`, or every entry
    /// when `pattern` is None.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self, pattern: Option<&str>) -> usize {
        let before = self.entries.len();
        match pattern {
            Some(pattern) => self.entries.retain(|key, _| !key.contains(pattern)),
            None => self.entries.clear(),
        }
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Mutable access to the counters, for request outcomes recorded by the executor.
    pub fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    // == Length ==
    /// Returns the current number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
