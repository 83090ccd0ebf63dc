//! Cache Module
//!
//! Provides concurrent memoization of compiled regex patterns, with
//! optional pattern canonicalization, usage-based eviction, and usage
//! telemetry.

mod canonical;
mod entry;
mod ledger;
mod regex_cache;
mod stats;
mod store;


// Re-export public types
pub use canonical::canonicalize;
pub use entry::CacheEntry;
pub use ledger::UsageLedger;
pub use regex_cache::{get_matcher, global, RegexCache};
pub use stats::CacheStats;
pub use store::{CacheStore, SweepPolicy};
