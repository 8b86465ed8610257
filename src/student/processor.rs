// src/student/processor.rs

//! The per-student unit of work.
//!
//! `StudentProcessor::process` syncs one repository, optionally moves it to
//! a historical snapshot, finds the submitted assignments, and renders a
//! report for each recorded assignment. It is a pure function of the student
//! name plus the immutable settings it was built with: the only side
//! effects land inside that student's own clone, and everything it learns is
//! returned by value.
//!
//! Syncing is destructive. When the clone has uncommitted changes they are
//! stashed and the stash is cleared straight away, so any local edits are
//! lost before pulling. Graders always see exactly what was pushed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};

use crate::config::{ConfigFile, SpecSet};
use crate::fs::FileSystem;
use crate::report::{no_submission, Interpreter};
use crate::types::Snapshot;
use crate::vcs::Git;

use super::folders;
use super::row::ResultRow;

/// Run-wide switches that affect how each student is handled.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Delete the clone and start from a fresh one.
    pub clean: bool,
    /// Skip the discard-and-pull sync.
    pub no_update: bool,
    /// Skip the unmerged-branch check.
    pub no_check: bool,
    pub snapshot: Snapshot,
    /// Assignment ids to render reports for.
    pub record: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            clean: false,
            no_update: false,
            no_check: false,
            snapshot: Snapshot::Latest,
            record: Vec::new(),
        }
    }
}

/// Everything one student produced.
#[derive(Debug, Clone)]
pub struct StudentOutcome {
    pub student: String,
    pub row: ResultRow,
    /// Report text keyed by assignment id.
    pub reports: BTreeMap<String, String>,
}

impl StudentOutcome {
    pub fn failed(student: impl Into<String>, message: impl Into<String>) -> Self {
        let student = student.into();
        Self {
            row: ResultRow::failed(student.clone(), message),
            student,
            reports: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentProcessor {
    fs: Arc<dyn FileSystem>,
    git: Git,
    interpreter: Interpreter,
    config: Arc<ConfigFile>,
    students_dir: PathBuf,
    options: Arc<RunOptions>,
    specs: Arc<SpecSet>,
}

impl StudentProcessor {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        git: Git,
        interpreter: Interpreter,
        config: Arc<ConfigFile>,
        students_dir: impl Into<PathBuf>,
        options: Arc<RunOptions>,
        specs: Arc<SpecSet>,
    ) -> Self {
        Self {
            fs,
            git,
            interpreter,
            config,
            students_dir: students_dir.into(),
            options,
            specs,
        }
    }

    /// Process one student. Never fails: any error becomes a failure row
    /// that still names the student.
    pub async fn process(&self, student: &str) -> StudentOutcome {
        let repo = self.students_dir.join(student);
        let mut reports = BTreeMap::new();

        let row = match self.process_inner(student, &repo, &mut reports).await {
            Ok(row) => row,
            Err(e) => {
                let message = format!("{e:#}");
                warn!(student, error = %message, "student processing failed");
                ResultRow::failed(student, message)
            }
        };

        StudentOutcome {
            student: student.to_string(),
            row,
            reports,
        }
    }

    async fn process_inner(
        &self,
        student: &str,
        repo: &Path,
        reports: &mut BTreeMap<String, String>,
    ) -> Result<ResultRow> {
        if self.options.clean {
            info!(student, "removing local clone");
            self.fs.remove_dir_all(repo)?;
        }

        if !self.fs.exists(repo) {
            let url = self.config.clone_url(student);
            self.git
                .clone_into(&url, &self.students_dir, student)
                .await
                .with_context(|| format!("could not clone {url}"))?;
        }
        if !self.fs.is_dir(repo) {
            bail!("{} is not a directory", repo.display());
        }

        if !self.options.no_update {
            self.sync(student, repo).await?;
        }

        let Some(day) = self.options.snapshot.date() else {
            return self.grade(student, repo, reports).await;
        };

        let rev = self.git.revision_before(repo, day).await?;
        info!(student, rev = %rev, day, "checking out historical revision");
        self.git.force_checkout(repo, &rev).await?;

        let graded = self.grade(student, repo, reports).await;
        let restored = self.git.restore_primary(repo).await;
        match (graded, restored) {
            (Ok(row), Ok(())) => Ok(row),
            (Ok(_), Err(e)) => Err(e.context("could not return to the primary branch")),
            (Err(e), Err(restore_err)) => {
                warn!(student, error = %restore_err, "could not return to the primary branch");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
        }
    }

    /// Throw away local changes, then pull. A failed pull is logged and the
    /// existing state graded as-is.
    async fn sync(&self, student: &str, repo: &Path) -> Result<()> {
        if self.git.is_dirty(repo).await? {
            info!(student, "discarding uncommitted changes in local clone");
            self.git.discard_local_changes(repo).await?;
        }

        let pulled = self.git.pull(repo).await;
        if !pulled.is_success() {
            warn!(
                student,
                status = %pulled.status,
                output = %pulled.output.trim(),
                "pull failed; grading the existing clone"
            );
        }
        Ok(())
    }

    async fn grade(
        &self,
        student: &str,
        repo: &Path,
        reports: &mut BTreeMap<String, String>,
    ) -> Result<ResultRow> {
        let unmerged = if self.options.no_check {
            None
        } else {
            Some(self.git.unmerged_branches(repo).await?)
        };

        let found = folders::discover(
            self.fs.as_ref(),
            repo,
            self.config.config.min_folder_size,
            &self.config.aliases,
        )?;
        debug!(student, homeworks = ?found.homeworks, labs = ?found.labs, "found submissions");

        for id in &self.options.record {
            let dir = repo.join(id);
            let report = if self.fs.is_dir(&dir) {
                let spec = self
                    .specs
                    .get(id)
                    .ok_or_else(|| anyhow!("no spec loaded for {id}"))?;
                self.interpreter
                    .render_assignment(id, student, spec, &dir, unmerged.as_deref())
                    .await
            } else {
                no_submission(id, student)
            };
            reports.insert(id.clone(), report);
        }

        let has_unmerged = unmerged.is_some_and(|b| !b.is_empty());
        Ok(ResultRow::completed(student, has_unmerged, found))
    }
}
