// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the [`CommandRunner`] seam and the value types that
//!   cross it ([`Invocation`], [`CommandResult`], [`CommandStatus`]).
//! - [`command`] is the production runner built on `tokio::process`: piped
//!   stdin, merged stdout/stderr, optional wall-clock timeout.
//! - [`template`] parses spec command strings into typed templates with
//!   explicit substitution slots.

pub mod backend;
pub mod command;
pub mod template;

pub use backend::{CommandResult, CommandRunner, CommandStatus, Invocation, RunFuture};
pub use command::{run_command, ProcessRunner};
pub use template::{CommandTemplate, TestPipeline, TARGET_PLACEHOLDER};
