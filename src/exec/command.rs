// src/exec/command.rs

//! Real command runner on top of `tokio::process`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::backend::{CommandResult, CommandRunner, CommandStatus, Invocation, RunFuture};

/// How long to keep collecting output once the process is gone. Pipes
/// normally close immediately, but a backgrounded grandchild can hold them.
const IO_CAPTURE_TIMEOUT: Duration = Duration::from_secs(2);

/// Runs each invocation as a child process. Holds no state; one value can
/// be shared freely between workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: Invocation) -> RunFuture<'_> {
        Box::pin(run_command(invocation))
    }
}

/// Execute one command and normalize the outcome.
pub async fn run_command(invocation: Invocation) -> CommandResult {
    let Some((program, args)) = invocation.argv.split_first() else {
        return CommandResult::missing("empty command");
    };

    let program = resolve_program(program, &invocation.cwd);
    debug!(
        cmd = %invocation.command_line(),
        cwd = ?invocation.cwd,
        timeout = ?invocation.timeout,
        "running command"
    );

    let mut cmd = Command::new(&program);
    cmd.args(args)
        .current_dir(&invocation.cwd)
        .stdin(if invocation.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            debug!(program = ?program, error = %e, "could not launch command");
            return CommandResult::missing(format!(
                "could not run `{}`: {e}",
                program.display()
            ));
        }
    };

    if let (Some(input), Some(mut stdin)) = (invocation.input, child.stdin.take()) {
        tokio::spawn(async move {
            // A program that exits without reading its input is not an error.
            let _ = stdin.write_all(&input).await;
        });
    }

    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    if let Some(stdout) = child.stdout.take() {
        spawn_pump(stdout, chunk_tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_pump(stderr, chunk_tx.clone());
    }
    drop(chunk_tx);

    let waited = match invocation.timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
        None => Some(child.wait().await),
    };

    let (status, exit_code) = match waited {
        Some(Ok(exit)) if exit.success() => (CommandStatus::Success, exit.code()),
        Some(Ok(exit)) => (CommandStatus::Failure, exit.code()),
        Some(Err(e)) => {
            warn!(program = ?program, error = %e, "waiting for command failed");
            (CommandStatus::Failure, None)
        }
        None => {
            debug!(program = ?program, "command timed out; killing");
            if let Err(e) = child.kill().await {
                warn!(program = ?program, error = %e, "failed to kill timed-out command");
            }
            (CommandStatus::Timeout, None)
        }
    };

    let output = collect_output(chunk_rx).await;
    debug!(program = ?program, %status, ?exit_code, bytes = output.len(), "command finished");

    CommandResult {
        status,
        output,
        exit_code,
    }
}

/// A relative program path with a separator (`./a.out`) is taken relative to
/// the invocation's directory, not ours.
fn resolve_program(program: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

fn spawn_pump<R>(mut reader: R, tx: mpsc::UnboundedSender<Vec<u8>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    });
}

async fn collect_output(mut rx: mpsc::UnboundedReceiver<Vec<u8>>) -> String {
    let deadline = tokio::time::Instant::now() + IO_CAPTURE_TIMEOUT;
    let mut bytes = Vec::new();

    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(chunk)) => bytes.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(_) => {
                while let Ok(chunk) = rx.try_recv() {
                    bytes.extend_from_slice(&chunk);
                }
                break;
            }
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
