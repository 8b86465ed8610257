// src/student/mod.rs

//! Per-student processing: repository sync, submission discovery, reports.

pub mod folders;
pub mod processor;
pub mod row;

pub use folders::{classify, discover, expand_aliases, AssignmentKind, Submissions};
pub use processor::{RunOptions, StudentOutcome, StudentProcessor};
pub use row::{ResultRow, RowStatus};
