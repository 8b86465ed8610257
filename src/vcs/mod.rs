// src/vcs/mod.rs

//! Git, as seen by the grader.
//!
//! Every operation is a plain `git` invocation through the shared
//! [`CommandRunner`], run in an explicit repository directory. Nothing here
//! changes the process working directory.

pub mod snapshot;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::exec::{CommandResult, CommandRunner, Invocation};

pub use snapshot::{resolve_snapshot, CHECKOUT_CUTOFF};

#[derive(Debug, Clone)]
pub struct Git {
    runner: Arc<dyn CommandRunner>,
    primary_branch: String,
}

impl Git {
    pub fn new(runner: Arc<dyn CommandRunner>, primary_branch: impl Into<String>) -> Self {
        Self {
            runner,
            primary_branch: primary_branch.into(),
        }
    }

    async fn git(&self, cwd: &Path, args: &[&str]) -> CommandResult {
        let argv = std::iter::once("git").chain(args.iter().copied());
        self.runner.run(Invocation::new(argv, cwd)).await
    }

    async fn git_ok(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        let result = self.git(cwd, args).await;
        if !result.is_success() {
            bail!(
                "`git {}` failed ({}): {}",
                args.join(" "),
                result.status,
                result.output.trim()
            );
        }
        Ok(result.output)
    }

    /// `git clone --quiet <url> <dir_name>`, run inside `parent`.
    pub async fn clone_into(&self, url: &str, parent: &Path, dir_name: &str) -> Result<()> {
        info!(url, dir = dir_name, "cloning repository");
        self.git_ok(parent, &["clone", "--quiet", url, dir_name])
            .await
            .map(|_| ())
    }

    /// True when `git status --porcelain` reports anything at all.
    pub async fn is_dirty(&self, repo: &Path) -> Result<bool> {
        let out = self.git_ok(repo, &["status", "--porcelain"]).await?;
        Ok(!out.trim().is_empty())
    }

    /// Stash every local change (untracked files included) and immediately
    /// drop the stash. Local edits are gone afterwards.
    pub async fn discard_local_changes(&self, repo: &Path) -> Result<()> {
        self.git_ok(repo, &["stash", "-u"]).await?;
        self.git_ok(repo, &["stash", "clear"]).await?;
        Ok(())
    }

    pub async fn pull(&self, repo: &Path) -> CommandResult {
        let branch = self.primary_branch.clone();
        self.git(repo, &["pull", "--quiet", "origin", &branch]).await
    }

    /// Last revision on the primary branch committed at or before the
    /// cutoff on `day` (`YYYY-MM-DD`).
    pub async fn revision_before(&self, repo: &Path, day: &str) -> Result<String> {
        let before = format!("--before={day} {CHECKOUT_CUTOFF}");
        let branch = self.primary_branch.clone();
        let out = self
            .git_ok(repo, &["rev-list", "-n", "1", &before, &branch])
            .await?;
        let rev = out.trim();
        if rev.is_empty() {
            bail!("no commits on {branch} at or before {day} {CHECKOUT_CUTOFF}");
        }
        Ok(rev.to_string())
    }

    pub async fn force_checkout(&self, repo: &Path, rev: &str) -> Result<()> {
        debug!(repo = ?repo, rev, "forcing checkout");
        self.git_ok(repo, &["checkout", rev, "--force", "--quiet"])
            .await
            .map(|_| ())
    }

    /// Put the clone back on the primary branch after a historical checkout.
    pub async fn restore_primary(&self, repo: &Path) -> Result<()> {
        let branch = self.primary_branch.clone();
        self.git_ok(repo, &["checkout", &branch, "--quiet", "--force"])
            .await
            .map(|_| ())
    }

    /// Commit date of the last change to `file`, if git knows one.
    pub async fn last_modified(&self, dir: &Path, file: &str) -> Option<String> {
        let result = self
            .git(dir, &["log", "-n", "1", "--pretty=format:%cd", "--", file])
            .await;
        let stamp = result.output.trim();
        (result.is_success() && !stamp.is_empty()).then(|| stamp.to_string())
    }

    /// Remote branches whose tips are not contained in the primary branch.
    pub async fn unmerged_branches(&self, repo: &Path) -> Result<Vec<String>> {
        let upstream = format!("origin/{}", self.primary_branch);
        let out = self
            .git_ok(repo, &["branch", "--remotes", "--no-merged", &upstream])
            .await?;
        Ok(parse_branch_list(&out, &upstream))
    }
}

/// Parse `git branch` output into branch names, dropping the current-branch
/// marker, symbolic `HEAD -> ...` lines and `exclude` itself.
pub fn parse_branch_list(output: &str, exclude: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim().trim_start_matches("* ").trim())
        .filter(|l| !l.is_empty() && !l.contains(" -> ") && *l != exclude)
        .map(str::to_string)
        .collect()
}
