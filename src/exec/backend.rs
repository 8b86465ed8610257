// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The interpreter and the git layer talk to a [`CommandRunner`] rather than
//! to `tokio::process` directly. Production code uses
//! [`ProcessRunner`](super::command::ProcessRunner); tests substitute a
//! scripted runner that records every [`Invocation`] and answers from a
//! table, so stage gating can be checked without spawning anything.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future returned by [`CommandRunner::run`].
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = CommandResult> + Send + 'a>>;

/// Trait abstracting how one external command is executed.
///
/// Implementations never fail: every problem (missing program, non-zero
/// exit, timeout) is reported through [`CommandResult::status`].
pub trait CommandRunner: Send + Sync + fmt::Debug {
    fn run(&self, invocation: Invocation) -> RunFuture<'_>;
}

/// A fully rendered command, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program followed by its arguments.
    pub argv: Vec<String>,
    /// Directory the program runs in.
    pub cwd: PathBuf,
    /// Bytes fed to stdin; `None` connects stdin to nothing.
    pub input: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new<I, S>(argv: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: argv.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            input: None,
            timeout: None,
        }
    }

    pub fn with_input(mut self, input: Option<Vec<u8>>) -> Self {
        self.input = input;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or("")
    }

    pub fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

/// Normalized outcome of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandStatus {
    /// Exited with code 0.
    Success,
    /// Exited non-zero, or was terminated by a signal we did not send.
    Failure,
    /// Killed after exceeding its time limit.
    Timeout,
    /// The program could not be located or launched.
    Missing,
}

impl CommandStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommandStatus::Success => "success",
            CommandStatus::Failure => "failure",
            CommandStatus::Timeout => "timeout",
            CommandStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a command produced. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    /// stdout and stderr, merged in arrival order and decoded lossily.
    pub output: String,
    /// Process exit code, when the process exited on its own.
    pub exit_code: Option<i32>,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            output: output.into(),
            exit_code: Some(0),
        }
    }

    pub fn failure(code: i32, output: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Failure,
            output: output.into(),
            exit_code: Some(code),
        }
    }

    pub fn timeout(partial_output: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Timeout,
            output: partial_output.into(),
            exit_code: None,
        }
    }

    pub fn missing(diagnostic: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Missing,
            output: diagnostic.into(),
            exit_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}
