//! Cache Entry Module
//!
//! Defines a cached response payload together with its insertion time.

use std::time::{Duration, Instant};

use serde_json::Value;

// == Cache Entry ==
/// A decoded response body and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Decoded response body, opaque to the cache
    pub payload: Value,
    /// Insertion time
    pub stored_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(payload: Value) -> Self {
        Self::stored_at(payload, Instant::now())
    }

    /// Creates an entry stamped with an explicit insertion time.
    pub fn stored_at(payload: Value, stored_at: Instant) -> Self {
        Self { payload, stored_at }
    }

    // == Freshness ==
    /// Checks whether the entry may still be served at `now`.
    ///
    /// Boundary condition: the entry is fresh while `now - stored_at < ttl`,
    /// so once the full TTL has elapsed it is stale.
    pub fn is_fresh_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) < ttl
    }

    /// Checks whether the entry may still be served now.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.is_fresh_at(Instant::now(), ttl)
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}
