//! Regex Cache Module
//!
//! The concurrent compile-or-fetch front over the cache store. One
//! `RegexCache` is shared by any number of callers; background
//! maintenance starts lazily on first use and can be shut down
//! explicitly by the embedding application.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, OnceLock};

use regex::Regex;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{canonicalize, CacheStats, CacheStore, SweepPolicy, UsageLedger};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_export_task, spawn_sweeper_task, ReportConfig};

// == Process-Wide Instance ==
/// Cache shared by [`get_matcher`], configured from the environment on
/// first access.
///
/// Initialization-once semantics: the environment is read exactly once,
/// when the instance is first touched. A malformed environment value is
/// a fatal configuration error and panics here.
static GLOBAL: LazyLock<RegexCache> = LazyLock::new(|| match RegexCache::from_env() {
    Ok(cache) => cache,
    Err(err) => panic!("recache: {err}"),
});

/// Returns the process-wide cache instance.
pub fn global() -> &'static RegexCache {
    &GLOBAL
}

/// Fetches a matcher from the process-wide cache, compiling on miss.
pub async fn get_matcher(pattern: &str) -> Result<Arc<Regex>> {
    GLOBAL.get(pattern).await
}

// == Regex Cache ==
/// Shared compile-or-fetch cache for regex patterns.
///
/// Cloning is cheap and yields a handle onto the same underlying table,
/// ledger, and toggle.
#[derive(Debug, Clone)]
pub struct RegexCache {
    /// Shared key→entry table
    store: Arc<RwLock<CacheStore>>,
    /// Per-pattern lookup counts for the report exporter
    ledger: Arc<RwLock<UsageLedger>>,
    /// Process-wide caching toggle
    caching_enabled: Arc<AtomicBool>,
    /// Start-up configuration, read once
    config: Config,
    /// Background task handles, populated on first use
    tasks: Arc<OnceLock<Vec<JoinHandle<()>>>>,
}

impl RegexCache {
    // == Constructors ==
    /// Creates a cache with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new())),
            ledger: Arc::new(RwLock::new(UsageLedger::new())),
            caching_enabled: Arc::new(AtomicBool::new(config.caching_enabled)),
            config,
            tasks: Arc::new(OnceLock::new()),
        }
    }

    /// Creates a cache configured from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    // == Get ==
    /// Fetches the matcher for a pattern, compiling and caching on miss.
    ///
    /// The only failure mode is the compiler rejecting the (possibly
    /// canonicalized) pattern; that error is fatal to this call, is not
    /// retried, and leaves no entry in the table. With caching disabled
    /// the table is bypassed entirely and every call compiles fresh.
    pub async fn get(&self, pattern: &str) -> Result<Arc<Regex>> {
        let key = self.effective_key(pattern);

        if self.telemetry_enabled() {
            self.ledger.write().await.record(&key);
        }

        self.ensure_background_tasks();

        if !self.is_caching_enabled() {
            return compile(&key);
        }

        if let Some(matcher) = self.store.write().await.lookup(&key) {
            return Ok(matcher);
        }

        // Compile outside the lock so a slow compile never serializes
        // unrelated lookups. Two callers racing on the same missing key
        // may both compile; insert_if_absent retains exactly one result.
        let matcher = compile(&key)?;
        Ok(self.store.write().await.insert_if_absent(key, matcher))
    }

    // == Preload ==
    /// Compiles and inserts known patterns before caller traffic begins.
    ///
    /// A malformed preload pattern is a configuration mistake, so any
    /// compile failure is returned immediately. No-op when preloading is
    /// disabled by configuration or caching is off.
    pub async fn preload<I, S>(&self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !self.config.preload_enabled || !self.is_caching_enabled() {
            debug!("preload skipped");
            return Ok(());
        }

        let mut count = 0usize;
        for pattern in patterns {
            let key = self.effective_key(pattern.as_ref());
            let matcher = compile(&key)?;
            self.store.write().await.insert_if_absent(key, matcher);
            count += 1;
        }

        info!("preloaded {} patterns", count);
        Ok(())
    }

    // == Caching Toggle ==
    /// Flips the process-wide caching toggle.
    ///
    /// Takes effect on the next call; a call already in flight completes
    /// wholly under whichever policy it started with.
    pub fn set_caching_enabled(&self, enabled: bool) {
        self.caching_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns the current state of the caching toggle.
    pub fn is_caching_enabled(&self) -> bool {
        self.caching_enabled.load(Ordering::Relaxed)
    }

    // == Accessors ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Returns the number of entries currently in the table.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Returns true if the table is empty.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Returns the ledger's cumulative lookup count for a pattern.
    pub async fn usage_count(&self, pattern: &str) -> u64 {
        let key = self.effective_key(pattern);
        self.ledger.read().await.count(&key)
    }

    // == Shutdown ==
    /// Aborts the background sweeper and exporter tasks.
    ///
    /// Idempotent; once shut down the tasks are not restarted.
    pub fn shutdown(&self) {
        if let Some(handles) = self.tasks.get() {
            for handle in handles {
                handle.abort();
            }
            info!("background tasks stopped");
        }
    }

    // == Internals ==
    /// Resolves the effective cache key for a pattern.
    fn effective_key(&self, pattern: &str) -> String {
        if self.config.canonicalize {
            canonicalize(pattern)
        } else {
            pattern.to_string()
        }
    }

    /// True when a report destination is configured.
    fn telemetry_enabled(&self) -> bool {
        self.config.report_path.is_some()
    }

    /// Starts the sweeper and exporter on first use; dormant otherwise.
    fn ensure_background_tasks(&self) {
        self.tasks.get_or_init(|| {
            let mut handles = Vec::new();

            if let Some(interval) = self.config.sweep_interval {
                let policy = SweepPolicy {
                    expiration: self.config.expiration,
                    minimum_uses: self.config.minimum_uses,
                    max_pass: self.config.max_sweep_duration,
                };
                handles.push(spawn_sweeper_task(Arc::clone(&self.store), policy, interval));
            }

            if let Some(path) = &self.config.report_path {
                let report = ReportConfig {
                    path: path.clone(),
                    minimum_count: self.config.report_minimum_count,
                };
                handles.push(spawn_export_task(
                    Arc::clone(&self.ledger),
                    report,
                    self.config.report_interval,
                ));
            }

            handles
        });
    }
}

// == Compile ==
/// Invokes the pattern compiler, wrapping its failure verbatim.
fn compile(key: &str) -> Result<Arc<Regex>> {
    Regex::new(key)
        .map(Arc::new)
        .map_err(|source| CacheError::Compile {
            pattern: key.to_string(),
            source,
        })
}
