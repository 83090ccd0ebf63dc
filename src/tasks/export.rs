//! Usage Report Export Task
//!
//! Background task that periodically writes per-pattern usage counts to
//! a report file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::UsageLedger;

// == Report Config ==
/// Destination and filter for usage reports.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// File the report is written to
    pub path: PathBuf,
    /// Minimum usage count for a pattern to be included
    pub minimum_count: u64,
}

/// Spawns a background task that periodically exports the usage ledger.
///
/// Each tick snapshots the ledger, filters it by `minimum_count`, and
/// writes a tab-separated report. A failed write is logged and retried
/// on the next tick; the in-memory ledger is never cleared, so no counts
/// are lost to an export failure.
///
/// Returns a `JoinHandle` that the embedding application can abort for
/// deterministic shutdown.
pub fn spawn_export_task(
    ledger: Arc<RwLock<UsageLedger>>,
    report: ReportConfig,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "starting report exporter: path={} interval={:?} minimum_count={}",
            report.path.display(),
            interval,
            report.minimum_count
        );

        loop {
            tokio::time::sleep(interval).await;

            let rows = {
                let ledger = ledger.read().await;
                ledger.snapshot(report.minimum_count)
            };

            match write_report(&report.path, &rows).await {
                Ok(()) => debug!("wrote usage report with {} rows", rows.len()),
                Err(err) => warn!(
                    "failed to write usage report to {}: {err}; retrying next interval",
                    report.path.display()
                ),
            }
        }
    })
}

// == Write Report ==
/// Writes one complete usage report.
///
/// Format: a `pattern<TAB>count` header followed by one row per pattern.
/// The report lands via a temporary file renamed into place, so readers
/// never observe a partially written report.
pub async fn write_report(path: &Path, rows: &[(String, u64)]) -> std::io::Result<()> {
    let mut body = String::with_capacity(rows.len() * 32 + 16);
    body.push_str("pattern\tcount\n");
    for (pattern, count) in rows {
        body.push_str(pattern);
        body.push('\t');
        body.push_str(&count.to_string());
        body.push('\n');
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp, body).await?;
    tokio::fs::rename(&tmp, path).await
}
