//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.
//! Values are read once at start-up; a malformed value is a fatal
//! configuration error, never silently defaulted.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CacheError, Result};

// == Environment Variables ==
/// Set (non-empty) to disable caching entirely
pub const RECACHE_OFF: &str = "RECACHE_OFF";
/// Sweep interval in milliseconds; below 1 disables the sweeper
pub const RECACHE_SWEEP_INTERVAL: &str = "RECACHE_SWEEP_INTERVAL";
/// Entry expiration in milliseconds
pub const RECACHE_EXPIRATION: &str = "RECACHE_EXPIRATION";
/// Minimum uses below which an aged-out entry is evicted; 0 disables the gate
pub const RECACHE_MINIMUM_USES: &str = "RECACHE_MINIMUM_USES";
/// Maximum duration of a single sweep pass, in milliseconds
pub const RECACHE_MAX_SWEEP: &str = "RECACHE_MAX_SWEEP";
/// Usage report destination; unset disables the exporter
pub const RECACHE_REPORT_FILE: &str = "RECACHE_REPORT_FILE";
/// Report interval in milliseconds
pub const RECACHE_REPORT_INTERVAL: &str = "RECACHE_REPORT_INTERVAL";
/// Minimum usage count for a pattern to appear in the report
pub const RECACHE_REPORT_MIN: &str = "RECACHE_REPORT_MIN";
/// Set (non-empty) to skip preloading
pub const RECACHE_NO_PRELOAD: &str = "RECACHE_NO_PRELOAD";
/// Set (non-empty) to canonicalize patterns before lookup
pub const RECACHE_CANONICALIZE: &str = "RECACHE_CANONICALIZE";

// == Defaults ==
const EXPIRATION_DEFAULT_MS: u64 = 10_000;
const MINIMUM_USES_DEFAULT: u64 = 2;
const MAX_SWEEP_DEFAULT_MS: u64 = 1_000;
const REPORT_INTERVAL_DEFAULT_MS: u64 = 60_000;
const REPORT_MIN_DEFAULT: u64 = 10;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables; see the
/// `RECACHE_*` constants for the recognized names.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether lookups go through the cache at all
    pub caching_enabled: bool,
    /// Interval between sweep passes; None means the sweeper never starts
    pub sweep_interval: Option<Duration>,
    /// Time since last use after which a rarely used entry is evictable
    pub expiration: Duration,
    /// Entries with fewer uses than this are evictable once aged out; 0 disables the gate
    pub minimum_uses: u64,
    /// Upper bound on the duration of a single sweep pass
    pub max_sweep_duration: Duration,
    /// Usage report destination; None disables the exporter
    pub report_path: Option<PathBuf>,
    /// Interval between report writes
    pub report_interval: Duration,
    /// Minimum usage count for a pattern to appear in the report
    pub report_minimum_count: u64,
    /// Whether start-up preloading is performed
    pub preload_enabled: bool,
    /// Whether patterns are canonicalized before use as cache keys
    pub canonicalize: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset (or empty) variables fall back to their defaults. A value
    /// that is set but fails to parse returns `CacheError::Config`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            caching_enabled: !flag(RECACHE_OFF),
            sweep_interval: parse_interval(RECACHE_SWEEP_INTERVAL, var(RECACHE_SWEEP_INTERVAL))?,
            expiration: parse_millis(RECACHE_EXPIRATION, var(RECACHE_EXPIRATION))?
                .unwrap_or(Duration::from_millis(EXPIRATION_DEFAULT_MS)),
            minimum_uses: parse_count(RECACHE_MINIMUM_USES, var(RECACHE_MINIMUM_USES))?
                .unwrap_or(MINIMUM_USES_DEFAULT),
            max_sweep_duration: parse_millis(RECACHE_MAX_SWEEP, var(RECACHE_MAX_SWEEP))?
                .unwrap_or(Duration::from_millis(MAX_SWEEP_DEFAULT_MS)),
            report_path: var(RECACHE_REPORT_FILE).map(PathBuf::from),
            report_interval: parse_millis(RECACHE_REPORT_INTERVAL, var(RECACHE_REPORT_INTERVAL))?
                .unwrap_or(Duration::from_millis(REPORT_INTERVAL_DEFAULT_MS)),
            report_minimum_count: parse_count(RECACHE_REPORT_MIN, var(RECACHE_REPORT_MIN))?
                .unwrap_or(REPORT_MIN_DEFAULT),
            preload_enabled: !flag(RECACHE_NO_PRELOAD),
            canonicalize: flag(RECACHE_CANONICALIZE),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            caching_enabled: true,
            sweep_interval: None,
            expiration: Duration::from_millis(EXPIRATION_DEFAULT_MS),
            minimum_uses: MINIMUM_USES_DEFAULT,
            max_sweep_duration: Duration::from_millis(MAX_SWEEP_DEFAULT_MS),
            report_path: None,
            report_interval: Duration::from_millis(REPORT_INTERVAL_DEFAULT_MS),
            report_minimum_count: REPORT_MIN_DEFAULT,
            preload_enabled: true,
            canonicalize: false,
        }
    }
}

// == Parsing Helpers ==

/// Reads an environment variable, treating empty as unset.
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// True when the variable is set to any non-empty value.
fn flag(name: &str) -> bool {
    var(name).is_some()
}

/// Parses a millisecond duration value.
fn parse_millis(name: &str, value: Option<String>) -> Result<Option<Duration>> {
    value
        .map(|v| {
            v.parse::<u64>().map(Duration::from_millis).map_err(|_| {
                CacheError::Config(format!("{name} must be a millisecond integer, got {v:?}"))
            })
        })
        .transpose()
}

/// Parses a non-negative count value.
fn parse_count(name: &str, value: Option<String>) -> Result<Option<u64>> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| CacheError::Config(format!("{name} must be an integer, got {v:?}")))
        })
        .transpose()
}

/// Parses a millisecond interval; values below 1 disable the schedule.
fn parse_interval(name: &str, value: Option<String>) -> Result<Option<Duration>> {
    match value {
        Some(v) => {
            let ms = v.parse::<i64>().map_err(|_| {
                CacheError::Config(format!("{name} must be a millisecond integer, got {v:?}"))
            })?;
            if ms < 1 {
                Ok(None)
            } else {
                Ok(Some(Duration::from_millis(ms as u64)))
            }
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.caching_enabled);
        assert!(config.sweep_interval.is_none());
        assert_eq!(config.expiration, Duration::from_millis(10_000));
        assert_eq!(config.minimum_uses, 2);
        assert_eq!(config.max_sweep_duration, Duration::from_millis(1_000));
        assert!(config.report_path.is_none());
        assert_eq!(config.report_interval, Duration::from_millis(60_000));
        assert_eq!(config.report_minimum_count, 10);
        assert!(config.preload_enabled);
        assert!(!config.canonicalize);
    }

    #[test]
    fn test_parse_millis_valid() {
        let parsed = parse_millis("X", Some("250".to_string())).unwrap();
        assert_eq!(parsed, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_parse_millis_unset() {
        assert_eq!(parse_millis("X", None).unwrap(), None);
    }

    #[test]
    fn test_parse_millis_rejects_garbage() {
        let result = parse_millis("RECACHE_EXPIRATION", Some("soon".to_string()));
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_parse_count_rejects_negative() {
        let result = parse_count("RECACHE_MINIMUM_USES", Some("-3".to_string()));
        assert!(matches!(result, Err(CacheError::Config(_))));
    }

    #[test]
    fn test_parse_interval_below_one_disables() {
        assert_eq!(parse_interval("X", Some("0".to_string())).unwrap(), None);
        assert_eq!(parse_interval("X", Some("-100".to_string())).unwrap(), None);
    }

    #[test]
    fn test_parse_interval_positive() {
        let parsed = parse_interval("X", Some("500".to_string())).unwrap();
        assert_eq!(parsed, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_parse_interval_rejects_garbage() {
        let result = parse_interval("RECACHE_SWEEP_INTERVAL", Some("never".to_string()));
        assert!(matches!(result, Err(CacheError::Config(_))));
    }
}
