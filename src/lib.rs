//! Recache - a concurrent memoizing cache for compiled regex patterns
//!
//! Compiling a pattern is expensive; recache hands repeated requests for
//! the same pattern the same shared matcher, evicts patterns not worth
//! retaining, and can periodically report per-pattern usage counts.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{canonicalize, get_matcher, global, CacheStats, RegexCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_export_task, spawn_sweeper_task, ReportConfig};
