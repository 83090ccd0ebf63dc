//! Maintenance Sweeper Task
//!
//! Background task that periodically evicts cache entries not worth
//! retaining.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, SweepPolicy};

/// Spawns a background task that periodically sweeps the cache store.
///
/// The task sleeps for `interval` between passes. Each pass acquires the
/// write lock and applies the retention policy; the pass itself is
/// time-boxed by `policy.max_pass`, so a large table defers remaining
/// entries to the next pass instead of holding the lock indefinitely.
///
/// Returns a `JoinHandle` that the embedding application can abort for
/// deterministic shutdown.
pub fn spawn_sweeper_task(
    store: Arc<RwLock<CacheStore>>,
    policy: SweepPolicy,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "starting sweeper: interval={:?} expiration={:?} minimum_uses={}",
            interval, policy.expiration, policy.minimum_uses
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = store.write().await;
                store.sweep(&policy)
            };

            if removed > 0 {
                info!("sweep pass removed {} entries", removed);
            } else {
                debug!("sweep pass removed nothing");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn policy(expiration_ms: u64, minimum_uses: u64) -> SweepPolicy {
        SweepPolicy {
            expiration: Duration::from_millis(expiration_ms),
            minimum_uses,
            max_pass: Duration::from_millis(1_000),
        }
    }

    async fn insert(store: &Arc<RwLock<CacheStore>>, key: &str) {
        let matcher = Arc::new(Regex::new(key).unwrap());
        store.write().await.insert_if_absent(key.to_string(), matcher);
    }

    #[tokio::test]
    async fn test_sweeper_task_evicts_rarely_used_aged_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));

        insert(&store, "once").await;
        // Age the entry well past a 50ms expiration
        store.write().await.backdate("once", 60_000);

        let handle = spawn_sweeper_task(store.clone(), policy(50, 2), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!store.read().await.contains("once"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_task_preserves_heavily_used_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));

        insert(&store, "hot").await;
        store.write().await.lookup("hot");
        store.write().await.lookup("hot");
        store.write().await.backdate("hot", 60_000);

        let handle = spawn_sweeper_task(store.clone(), policy(50, 2), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(store.read().await.contains("hot"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_task_preserves_recently_used_entries() {
        let store = Arc::new(RwLock::new(CacheStore::new()));

        insert(&store, "recent").await;

        let handle =
            spawn_sweeper_task(store.clone(), policy(60_000, 2), Duration::from_millis(50));

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(store.read().await.contains("recent"));
        handle.abort();
    }

    #[tokio::test]
    async fn test_sweeper_task_can_be_aborted() {
        let store = Arc::new(RwLock::new(CacheStore::new()));

        let handle = spawn_sweeper_task(store, policy(50, 2), Duration::from_millis(50));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished());
    }
}
