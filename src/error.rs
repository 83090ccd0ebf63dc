//! Error types for the pattern cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the pattern cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The pattern is not a valid expression for the compiler.
    ///
    /// Fatal to the requesting call; the failed pattern never occupies
    /// a cache slot and the call is not retried.
    #[error("invalid pattern {pattern:?}: {source}")]
    Compile {
        /// The pattern text handed to the compiler (after canonicalization)
        pattern: String,
        /// The underlying compiler error, propagated verbatim
        #[source]
        source: regex::Error,
    },

    /// Malformed start-up configuration (e.g. a non-numeric interval)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failure to write a usage report.
    ///
    /// Contained within the export loop: logged and retried on the next
    /// interval, never surfaced to cache callers.
    #[error("report write failed: {0}")]
    ReportIo(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the pattern cache.
pub type Result<T> = std::result::Result<T, CacheError>;
