// src/report/mod.rs

//! Turning a submission plus a [`TestSpec`](crate::config::TestSpec) into
//! markdown.
//!
//! - [`interpreter`] runs the staged build/test pipeline for one file.
//! - [`assignment`] wraps the per-file fragments into one report per
//!   assignment and manages fixture files.
//! - [`fragment`] and [`text`] hold the rendering helpers.

pub mod assignment;
pub mod fragment;
pub mod interpreter;
pub mod text;

pub use assignment::no_submission;
pub use fragment::FileReport;
pub use interpreter::{relative_target, Interpreter};
pub use text::{indent4, unicode_truncate};
