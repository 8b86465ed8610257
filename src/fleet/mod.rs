// src/fleet/mod.rs

//! Fleet-level orchestration.
//!
//! - [`scheduler`] fans the student processor out over a bounded pool.
//! - [`reports`] owns the per-assignment report files.
//! - [`table`] aggregates and renders result rows.
//! - [`progress`] is the sink for progress updates.

pub mod progress;
pub mod reports;
pub mod scheduler;
pub mod table;

pub use progress::{NoProgress, ProgressSink, StderrProgress};
pub use reports::ReportFiles;
pub use scheduler::FleetScheduler;
pub use table::AggregateTable;
