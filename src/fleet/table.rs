// src/fleet/table.rs

use std::cmp::Reverse;

use crate::student::{ResultRow, RowStatus};
use crate::types::SortBy;

/// All result rows of a run, in whatever order they were added until
/// [`sort`](Self::sort) is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateTable {
    rows: Vec<ResultRow>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn sort(&mut self, by: SortBy) {
        match by {
            SortBy::Name => self.rows.sort_by(|a, b| a.student.cmp(&b.student)),
            SortBy::Homework => self.rows.sort_by(|a, b| {
                (Reverse(a.homework_count()), &a.student)
                    .cmp(&(Reverse(b.homework_count()), &b.student))
            }),
        }
    }

    /// Column-aligned rendering for the terminal. Failure rows are printed
    /// verbatim below the header, in their sorted position.
    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .filter(|r| !r.is_failed())
            .map(|r| r.label().chars().count())
            .chain(std::iter::once("USER".len()))
            .max()
            .unwrap_or(4);

        let mut out = format!("{:<width$} | HOMEWORK | LABS\n", "USER");
        out.push_str(&format!("{}-+----------+-----\n", "-".repeat(width)));

        for row in &self.rows {
            match &row.status {
                RowStatus::Completed {
                    homeworks, labs, ..
                } => {
                    out.push_str(&format!(
                        "{:<width$} | {} | {}\n",
                        row.label(),
                        or_dash(homeworks.iter()),
                        or_dash(labs.iter()),
                    ));
                }
                RowStatus::Failed { .. } => {
                    out.push_str(&row.to_string());
                    out.push('\n');
                }
            }
        }

        out
    }
}

fn or_dash<'a>(items: impl Iterator<Item = &'a String>) -> String {
    let joined = items.map(String::as_str).collect::<Vec<_>>().join(" ");
    if joined.is_empty() { "-".to_string() } else { joined }
}
