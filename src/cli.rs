// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! List-valued flags may be repeated and each occurrence may carry several
//! values (`--students amy max --students rives`); [`CliArgs::students`] and
//! friends flatten those into a single list.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::SortBy;

/// Command-line arguments for `gradefleet`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gradefleet",
    version,
    about = "Sync student repositories, build and test their submissions, and tabulate the results.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the global config file (TOML).
    ///
    /// Default: `gradefleet.toml` in the current directory, if it exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Be quieter: no progress line, no table.
    #[arg(long, short)]
    pub quiet: bool,

    /// Do not update the student folders before checking.
    #[arg(long, short = 'n')]
    pub no_update: bool,

    /// Do not check for unmerged branches.
    #[arg(long, short = 'c')]
    pub no_check: bool,

    /// Check out each repository as of 18:00 on the most recent <DAY> (e.g. "fri").
    #[arg(long, value_name = "DAY", conflicts_with = "date")]
    pub day: Option<String>,

    /// Check out each repository as of 18:00 on <DATE> (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub date: Option<String>,

    /// Remove student folders and re-clone them.
    #[arg(long)]
    pub clean: bool,

    /// Record build/test reports for these assignments. Requires a spec file each.
    #[arg(long, value_name = "HW", num_args = 1.., action = clap::ArgAction::Append)]
    pub record: Vec<String>,

    /// Only iterate over these students ("-" reads more from stdin).
    #[arg(long, value_name = "STUDENT", num_args = 1.., action = clap::ArgAction::Append)]
    pub students: Vec<String>,

    /// Only check these roster sections: my, all, a, b, ...
    #[arg(long, value_name = "SECTION", num_args = 1.., action = clap::ArgAction::Append)]
    pub section: Vec<String>,

    /// Shorthand for `--section all`.
    #[arg(long)]
    pub all: bool,

    /// Sort the table by student name or by homework count.
    #[arg(long, value_enum, default_value_t = SortBy::Name)]
    pub sort_by: SortBy,

    /// Number of students to process in parallel (defaults to `[config].workers`).
    #[arg(long, short, value_name = "N")]
    pub workers: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GRADEFLEET_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve students, specs and settings, print the plan, and exit.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub const DEFAULT_CONFIG: &str = "gradefleet.toml";

impl CliArgs {
    /// Config path to load, and whether the user named it explicitly.
    pub fn config_path(&self) -> (PathBuf, bool) {
        match &self.config {
            Some(path) => (path.clone(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        }
    }

    /// Sections to select from, with `--all` folded in.
    pub fn sections(&self) -> Vec<String> {
        if self.all {
            vec!["all".to_string()]
        } else {
            self.section.clone()
        }
    }

    /// Replace `-` placeholders with lines read from `stdin_lines`.
    ///
    /// Only one list can consume stdin: students take priority, then
    /// `--record`.
    pub fn expand_stdin(&mut self, stdin_lines: impl FnOnce() -> Vec<String>) {
        let wants = |list: &[String]| list.iter().any(|s| s == "-");

        let target = if wants(&self.students) {
            &mut self.students
        } else if wants(&self.record) {
            &mut self.record
        } else {
            return;
        };

        target.retain(|s| s != "-");
        target.extend(
            stdin_lines()
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        );
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
