//! Cache Entry Module
//!
//! Defines the structure of individual cache entries with usage bookkeeping.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;

// == Cache Entry ==
/// A compiled pattern together with its usage bookkeeping.
///
/// The matcher is shared and read-only: once created it is never mutated,
/// so callers holding a clone of the `Arc` can keep using it safely even
/// after the entry has been evicted from the table.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The compiled matcher
    pub matcher: Arc<Regex>,
    /// Number of successful lookups, including the initial insert
    pub hit_count: u64,
    /// Timestamp of the most recent lookup (Unix milliseconds)
    pub last_used_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry for a freshly compiled matcher.
    ///
    /// The insert itself counts as one use.
    pub fn new(matcher: Arc<Regex>) -> Self {
        Self {
            matcher,
            hit_count: 1,
            last_used_at: current_timestamp_ms(),
        }
    }

    // == Record Use ==
    /// Bumps the hit count and refreshes the last-use timestamp.
    pub fn record_use(&mut self, now_ms: u64) {
        self.hit_count += 1;
        self.last_used_at = now_ms;
    }

    // == Is Evictable ==
    /// Retention test applied by a sweep pass.
    ///
    /// An entry is evictable only when both conditions hold: its hit count
    /// is below `minimum_uses` (a value of 0 disables the use-count gate)
    /// and the time since its last use exceeds `expiration_ms`. A heavily
    /// used entry is never evicted by age alone; a rarely used but recently
    /// touched entry survives until it ages out.
    pub fn is_evictable(&self, now_ms: u64, expiration_ms: u64, minimum_uses: u64) -> bool {
        let rarely_used = self.hit_count < minimum_uses || minimum_uses == 0;
        let aged_out = now_ms.saturating_sub(self.last_used_at) > expiration_ms;
        rarely_used && aged_out
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
