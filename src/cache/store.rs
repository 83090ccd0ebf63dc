//! Cache Store Module
//!
//! The key→entry table underneath the concurrent cache front. The store
//! itself is single-threaded; all concurrent access goes through the
//! `RwLock` owned by [`crate::cache::RegexCache`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use regex::Regex;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats};

// == Sweep Policy ==
/// Retention parameters applied by a sweep pass.
#[derive(Debug, Clone)]
pub struct SweepPolicy {
    /// Time since last use after which a rarely used entry is evictable
    pub expiration: Duration,
    /// Entries with fewer uses than this are evictable once aged out; 0 disables the gate
    pub minimum_uses: u64,
    /// Upper bound on the duration of a single pass
    pub max_pass: Duration,
}

// == Cache Store ==
/// Mapping from canonical pattern text to its compiled entry.
///
/// Entries are created lazily on first miss and removed only by sweep
/// passes; no caller owns an entry besides the table itself.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key→entry storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lookup ==
    /// Fetches the matcher for a key, bumping its usage bookkeeping.
    ///
    /// Returns None (and records a miss) when the key is absent; the
    /// caller is expected to compile outside the table lock and then
    /// [`CacheStore::insert_if_absent`] the result.
    pub fn lookup(&mut self, key: &str) -> Option<Arc<Regex>> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.record_use(current_timestamp_ms());
                self.stats.record_hit();
                Some(Arc::clone(&entry.matcher))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert If Absent ==
    /// Stores a freshly compiled matcher unless the key is already present.
    ///
    /// When two callers race on the same missing key, the first stored
    /// matcher wins and is returned to both; the table never holds two
    /// entries for one key. The losing caller's compile is discarded.
    pub fn insert_if_absent(&mut self, key: String, matcher: Arc<Regex>) -> Arc<Regex> {
        let retained = match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                entry.record_use(current_timestamp_ms());
                Arc::clone(&entry.matcher)
            }
            Entry::Vacant(vacant) => {
                let entry = vacant.insert(CacheEntry::new(matcher));
                Arc::clone(&entry.matcher)
            }
        };

        self.stats.set_total_entries(self.entries.len());
        retained
    }

    // == Sweep ==
    /// Runs one eviction pass and returns the number of entries removed.
    ///
    /// Scanning stops once `policy.max_pass` has elapsed; remaining
    /// entries are deferred to the next pass so a large table cannot
    /// hold the write lock indefinitely.
    pub fn sweep(&mut self, policy: &SweepPolicy) -> usize {
        let deadline = Instant::now() + policy.max_pass;
        let now = current_timestamp_ms();
        let expiration_ms = policy.expiration.as_millis() as u64;

        let mut doomed = Vec::new();
        for (key, entry) in &self.entries {
            if entry.is_evictable(now, expiration_ms, policy.minimum_uses) {
                doomed.push(key.clone());
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        for key in &doomed {
            self.entries.remove(key);
            self.stats.record_eviction();
        }

        self.stats.set_total_entries(self.entries.len());
        doomed.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Inspect ==
    /// Returns the hit count recorded for a key, if present.
    pub fn hit_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.hit_count)
    }

    /// Returns true if the key has an entry in the table.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Test Support ==
    /// Backdates an entry's last-use timestamp.
    #[cfg(test)]
    pub(crate) fn backdate(&mut self, key: &str, ms: u64) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used_at = entry.last_used_at.saturating_sub(ms);
        }
    }
}
