//! Cache Statistics Module
//!
//! Tracks cache effectiveness and request outcomes for the client.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how requests were served.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// GETs answered from a fresh cache entry
    pub hits: u64,
    /// Cache lookups that found nothing usable
    pub misses: u64,
    /// Requests that went to the network
    pub network_requests: u64,
    /// Requests that ended with the cancellation sentinel
    pub cancellations: u64,
    /// Cancelled GETs answered from cache instead
    pub fallbacks: u64,
    /// Current number of entries in the cache (fresh or stale)
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Network Request ==
    /// Counts a request sent to the network.
    pub fn record_network_request(&mut self) {
        self.network_requests += 1;
    }

    // == Record Cancellation ==
    /// Counts a request that ended cancelled.
    pub fn record_cancellation(&mut self) {
        self.cancellations += 1;
    }

    // == Record Fallback ==
    /// Counts a cancelled GET answered from cache.
    pub fn record_fallback(&mut self) {
        self.fallbacks += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
