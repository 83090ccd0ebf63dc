//! Background Tasks Module
//!
//! Contains the two long-lived background loops started on first cache
//! use.
//!
//! # Tasks
//! - Sweeper: evicts rarely used, aged-out entries at configured intervals
//! - Exporter: periodically writes per-pattern usage counts to a report file

mod export;
mod sweeper;

pub use export::{spawn_export_task, write_report, ReportConfig};
pub use sweeper::spawn_sweeper_task;
