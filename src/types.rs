// src/types.rs

//! Small shared enums used by both the CLI and the fleet layer.

use clap::ValueEnum;

/// Ordering applied to the aggregate table before it is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortBy {
    /// Alphabetical by student name.
    #[default]
    Name,
    /// Most completed homeworks first, ties broken by name.
    Homework,
}

/// Which historical snapshot (if any) to grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Whatever the primary branch points at after syncing.
    Latest,
    /// The last revision committed at or before 18:00 on this `YYYY-MM-DD` day.
    AsOf(String),
}

impl Snapshot {
    pub fn date(&self) -> Option<&str> {
        match self {
            Snapshot::Latest => None,
            Snapshot::AsOf(day) => Some(day),
        }
    }
}
