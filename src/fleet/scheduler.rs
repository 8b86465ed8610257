// src/fleet/scheduler.rs

//! Fan-out of the student processor over the whole roster.
//!
//! With more than one worker, every student becomes its own Tokio task and a
//! semaphore bounds how many run at once. Tasks share nothing mutable: each
//! gets a clone of the processor (immutable settings behind `Arc`s) and
//! hands back a [`StudentOutcome`] by value. Each unit of work is further
//! wrapped in its own spawned task, so even a panic is confined to that one
//! student and comes back as a failure row.
//!
//! The scheduler is the only writer of the table and the report files.
//! Results are consumed in completion order, so report files are appended
//! in completion order too; the table is sorted afterwards by the caller.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::student::{StudentOutcome, StudentProcessor};

use super::progress::ProgressSink;
use super::reports::ReportFiles;
use super::table::AggregateTable;

pub struct FleetScheduler {
    processor: StudentProcessor,
    workers: usize,
    progress: Arc<dyn ProgressSink>,
}

impl FleetScheduler {
    pub fn new(processor: StudentProcessor, workers: usize, progress: Arc<dyn ProgressSink>) -> Self {
        Self {
            processor,
            workers: workers.max(1),
            progress,
        }
    }

    /// Process every student and collect the results.
    ///
    /// Only report-file write errors propagate; per-student failures are
    /// already rows by the time they get here.
    pub async fn run(&self, students: &[String], reports: &mut ReportFiles) -> Result<AggregateTable> {
        let mut tracker = Tracker::new(students, self.progress.as_ref());
        let mut table = AggregateTable::new();

        info!(students = students.len(), workers = self.workers, "dispatching students");

        if self.workers > 1 {
            let limit = Arc::new(Semaphore::new(self.workers));
            let mut pool = JoinSet::new();

            for student in students {
                let limit = Arc::clone(&limit);
                let processor = self.processor.clone();
                let student = student.clone();
                pool.spawn(async move {
                    let _permit = limit.acquire_owned().await;
                    isolated(processor, student).await
                });
            }

            while let Some(joined) = pool.join_next().await {
                match joined {
                    Ok(outcome) => tracker.accept(outcome, &mut table, reports)?,
                    Err(e) => warn!(error = %e, "worker task did not complete"),
                }
            }

            // Every student still gets exactly one row.
            for student in tracker.unfinished() {
                let outcome = StudentOutcome::failed(student, "worker task did not complete");
                tracker.accept(outcome, &mut table, reports)?;
            }
        } else {
            for student in students {
                let outcome = isolated(self.processor.clone(), student.clone()).await;
                tracker.accept(outcome, &mut table, reports)?;
            }
        }

        self.progress.finish();
        info!(rows = table.len(), "all students processed");
        Ok(table)
    }
}

/// Run one student in a task of its own, turning a panic into a failure row.
async fn isolated(processor: StudentProcessor, student: String) -> StudentOutcome {
    let name = student.clone();
    let handle = tokio::spawn(async move { processor.process(&student).await });
    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(student = %name, error = %e, "student worker crashed");
            StudentOutcome::failed(name, format!("worker crashed: {e}"))
        }
    }
}

/// Bookkeeping for arrivals: progress reporting plus table/report writes.
struct Tracker<'a> {
    total: usize,
    remaining: BTreeSet<String>,
    progress: &'a dyn ProgressSink,
}

impl<'a> Tracker<'a> {
    fn new(students: &[String], progress: &'a dyn ProgressSink) -> Self {
        let tracker = Self {
            total: students.len(),
            remaining: students.iter().cloned().collect(),
            progress,
        };
        tracker.report();
        tracker
    }

    fn report(&self) {
        let running: Vec<&str> = self.remaining.iter().map(String::as_str).collect();
        self.progress
            .update(self.total, self.total - self.remaining.len(), &running.join(", "));
    }

    fn unfinished(&self) -> Vec<String> {
        self.remaining.iter().cloned().collect()
    }

    fn accept(
        &mut self,
        outcome: StudentOutcome,
        table: &mut AggregateTable,
        reports: &mut ReportFiles,
    ) -> Result<()> {
        debug!(student = %outcome.student, failed = outcome.row.is_failed(), "student finished");
        self.remaining.remove(&outcome.student);
        self.report();
        reports.append(&outcome.reports)?;
        table.push(outcome.row);
        Ok(())
    }
}
