// src/fleet/progress.rs

use std::io::Write;

/// Receives `(total, completed, still running)` after each student finishes.
pub trait ProgressSink: Send + Sync {
    fn update(&self, total: usize, completed: usize, running: &str);

    /// Called once after the last update.
    fn finish(&self) {}
}

/// Discards everything (`--quiet`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _total: usize, _completed: usize, _running: &str) {}
}

/// Redraws a single status line on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrProgress;

const LABEL_WIDTH: usize = 60;

impl ProgressSink for StderrProgress {
    fn update(&self, total: usize, completed: usize, running: &str) {
        let mut label: String = running.chars().take(LABEL_WIDTH).collect();
        if running.chars().count() > LABEL_WIDTH {
            label.push('…');
        }
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "\r\x1b[2K[{completed}/{total}] remaining: {label}");
        let _ = err.flush();
    }

    fn finish(&self) {
        let _ = writeln!(std::io::stderr());
    }
}
