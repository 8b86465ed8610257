// src/student/row.rs

use std::collections::BTreeSet;
use std::fmt;

use super::folders::Submissions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    Completed {
        /// At least one branch has work not merged into the primary branch.
        unmerged: bool,
        homeworks: BTreeSet<String>,
        labs: BTreeSet<String>,
    },
    Failed {
        message: String,
    },
}

/// One student's line in the aggregate table.
///
/// Renders as `student[ !]\t<homeworks>\t<labs>`, or `student: <error>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub student: String,
    pub status: RowStatus,
}

impl ResultRow {
    pub fn completed(student: impl Into<String>, unmerged: bool, found: Submissions) -> Self {
        Self {
            student: student.into(),
            status: RowStatus::Completed {
                unmerged,
                homeworks: found.homeworks,
                labs: found.labs,
            },
        }
    }

    pub fn failed(student: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            student: student.into(),
            status: RowStatus::Failed {
                message: message.into(),
            },
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, RowStatus::Failed { .. })
    }

    pub fn homework_count(&self) -> usize {
        match &self.status {
            RowStatus::Completed { homeworks, .. } => homeworks.len(),
            RowStatus::Failed { .. } => 0,
        }
    }

    /// Student name, with ` !` appended when unmerged work was found.
    pub fn label(&self) -> String {
        match &self.status {
            RowStatus::Completed { unmerged: true, .. } => format!("{} !", self.student),
            _ => self.student.clone(),
        }
    }
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
}

impl fmt::Display for ResultRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            RowStatus::Completed {
                homeworks, labs, ..
            } => write!(f, "{}\t{}\t{}", self.label(), join(homeworks), join(labs)),
            RowStatus::Failed { message } => write!(f, "{}: {}", self.student, message),
        }
    }
}
