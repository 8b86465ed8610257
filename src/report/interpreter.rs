// src/report/interpreter.rs

//! Test spec interpreter: builds and tests one submitted file.
//!
//! Stages run strictly in order and each one gates the next:
//!
//! 1. existence: a missing file gets a directory listing and nothing else
//! 2. header with the last commit date (best effort)
//! 3. contents, optionally truncated
//! 4. build steps, stopping at the first one that does not succeed
//! 5. tests, only when there were build steps and all of them succeeded
//!
//! Nothing here returns an error. Every problem ends up as report text.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{FileEntry, FileOptions, TestSpec};
use crate::exec::{CommandRunner, Invocation, TestPipeline};
use crate::fs::FileSystem;
use crate::vcs::Git;

use super::fragment::FileReport;
use super::text::unicode_truncate;

#[derive(Debug, Clone)]
pub struct Interpreter {
    pub(super) runner: Arc<dyn CommandRunner>,
    pub(super) fs: Arc<dyn FileSystem>,
    pub(super) git: Git,
}

impl Interpreter {
    pub fn new(runner: Arc<dyn CommandRunner>, fs: Arc<dyn FileSystem>, git: Git) -> Self {
        Self { runner, fs, git }
    }

    /// Run every stage for `file` inside `cwd` and render the fragment.
    pub async fn process_file(&self, file: &FileEntry, spec: &TestSpec, cwd: &Path) -> String {
        let name = file.name.as_str();
        let options = spec.options_for(name);
        let mut report = FileReport::new();

        let contents = match self.fs.read(&cwd.join(name)) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!(file = name, error = %e, "submitted file is missing");
                report.header(name, None);
                let listing = self.fs.list_names(cwd).unwrap_or_else(|e| {
                    vec![format!("(could not list directory: {e})")]
                });
                report.missing_file(name, &listing);
                return report.finish();
            }
        };

        let stamp = self.git.last_modified(cwd, name).await;
        report.header(name, stamp.as_deref());

        let shown = match options.truncate_contents {
            Some(limit) => unicode_truncate(&contents, limit),
            None => contents.as_str(),
        };
        report.contents(name, shown);

        if !self.build(file, cwd, &mut report).await {
            return report.finish();
        }

        for test in spec.tests_for(name) {
            self.run_test(name, test, &options, cwd, &mut report).await;
        }

        report.finish()
    }

    /// Run build steps in order. Returns true only if there was at least one
    /// step and every step succeeded.
    async fn build(&self, file: &FileEntry, cwd: &Path, report: &mut FileReport) -> bool {
        if file.steps.is_empty() {
            return false;
        }

        for step in &file.steps {
            let argv = step.render(&file.name);
            let result = self.runner.run(Invocation::new(argv, cwd)).await;
            report.build_output(&step.display(&file.name), &result.output);

            if !result.is_success() {
                debug!(
                    file = %file.name,
                    step = %step,
                    status = %result.status,
                    "build step failed; skipping remaining steps and tests"
                );
                return false;
            }
        }

        true
    }

    async fn run_test(
        &self,
        name: &str,
        test: &TestPipeline,
        options: &FileOptions,
        cwd: &Path,
        report: &mut FileReport,
    ) {
        let target = relative_target(name);

        let mut input: Option<Vec<u8>> = None;
        for setup in test.setup() {
            let argv = setup.render_unescaped(&target);
            let result = self
                .runner
                .run(Invocation::new(argv, cwd).with_input(input.take()))
                .await;
            if !result.is_success() {
                warn!(test = test.source(), setup = %setup, status = %result.status, "setup command did not succeed");
            }
            input = Some(result.output.into_bytes());
        }

        // An earlier test may have deleted or renamed the file.
        if !self.fs.exists(&cwd.join(name)) {
            report.test_target_missing(name);
            return;
        }

        let argv = test.measured().render(&target);
        let result = self
            .runner
            .run(
                Invocation::new(argv, cwd)
                    .with_input(input)
                    .with_timeout(options.timeout),
            )
            .await;

        let shown = unicode_truncate(&result.output, options.truncate_after);
        let truncated_at = (shown.len() < result.output.len()).then_some(options.truncate_after);
        report.test_result(test.source(), result.status, truncated_at, shown);
    }
}

/// `tiny.cpp` -> `./tiny.cpp`, so the shell-free runner treats it as a path.
pub fn relative_target(name: &str) -> String {
    let trimmed = name.trim_start_matches("./");
    if Path::new(trimmed).is_absolute() {
        trimmed.to_string()
    } else {
        format!("./{trimmed}")
    }
}
