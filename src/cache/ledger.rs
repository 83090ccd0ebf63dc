//! Usage Ledger Module
//!
//! Cumulative per-pattern lookup counts consumed by the report exporter.
//!
//! The ledger is distinct from per-entry hit counts: it records every
//! lookup request, whether or not the request was served from the table,
//! and it is never trimmed by sweep passes. It grows monotonically and is
//! cleared only at process start.

use std::collections::HashMap;

// == Usage Ledger ==
/// Mapping from pattern text to a cumulative count of lookup requests.
#[derive(Debug, Default)]
pub struct UsageLedger {
    counts: HashMap<String, u64>,
}

impl UsageLedger {
    // == Constructor ==
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Counts one lookup request for the given pattern.
    pub fn record(&mut self, pattern: &str) {
        if let Some(count) = self.counts.get_mut(pattern) {
            *count += 1;
        } else {
            self.counts.insert(pattern.to_string(), 1);
        }
    }

    // == Count ==
    /// Returns the cumulative lookup count for a pattern.
    pub fn count(&self, pattern: &str) -> u64 {
        self.counts.get(pattern).copied().unwrap_or(0)
    }

    // == Snapshot ==
    /// Returns the rows that belong in a usage report.
    ///
    /// Patterns below `minimum_count` are omitted. Rows are ordered by
    /// descending count, ties broken by ascending pattern text, so a
    /// report is deterministic for a given ledger state.
    pub fn snapshot(&self, minimum_count: u64) -> Vec<(String, u64)> {
        let mut rows: Vec<(String, u64)> = self
            .counts
            .iter()
            .filter(|(_, &count)| count >= minimum_count)
            .map(|(pattern, &count)| (pattern.clone(), count))
            .collect();

        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        rows
    }

    // == Length ==
    /// Returns the number of distinct patterns seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
