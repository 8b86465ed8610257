// src/report/assignment.rs

//! Whole-assignment reports: one heading, the unmerged-branch preamble, and
//! one fragment per spec file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::TestSpec;

use super::interpreter::Interpreter;

/// Report for a student with no folder for the assignment.
pub fn no_submission(assignment: &str, student: &str) -> String {
    format!("# {assignment} — {student}\n\n**no submission**\n\n")
}

fn unmerged_preamble(branches: &[String]) -> String {
    if branches.is_empty() {
        return String::new();
    }
    let mut out = String::from("Unmerged branches:\n");
    for branch in branches {
        out.push_str("    ");
        out.push_str(branch);
        out.push('\n');
    }
    out.push_str("\n\n\n");
    out
}

impl Interpreter {
    /// Build the full report for `assignment` from the submission in `dir`.
    ///
    /// Fixture inputs are written into `dir` first and removed afterwards,
    /// together with any `<file>.exec` the build steps left behind, whether
    /// or not rendering succeeded. If the fixtures cannot be written, the
    /// error text becomes the report.
    pub async fn render_assignment(
        &self,
        assignment: &str,
        student: &str,
        spec: &TestSpec,
        dir: &Path,
        unmerged: Option<&[String]>,
    ) -> String {
        let rendered = self
            .render_assignment_inner(assignment, student, spec, dir, unmerged)
            .await;
        self.clean_up(spec, dir);

        match rendered {
            Ok(report) => report,
            Err(e) => {
                warn!(assignment, student, error = %e, "could not assemble report");
                format!("# {assignment} — {student}\n\n{e:#}\n\n")
            }
        }
    }

    async fn render_assignment_inner(
        &self,
        assignment: &str,
        student: &str,
        spec: &TestSpec,
        dir: &Path,
        unmerged: Option<&[String]>,
    ) -> Result<String> {
        for (name, contents) in &spec.inputs {
            self.fs
                .write(&dir.join(name), contents.as_bytes())
                .with_context(|| format!("writing input fixture {name}"))?;
        }

        let mut fragments = Vec::with_capacity(spec.files.len());
        for file in &spec.files {
            debug!(assignment, student, file = %file.name, "processing file");
            fragments.push(self.process_file(file, spec, dir).await);
        }

        Ok(format!(
            "# {assignment} — {student}\n\n{}{}",
            unmerged_preamble(unmerged.unwrap_or(&[])),
            fragments.concat()
        ))
    }

    fn clean_up(&self, spec: &TestSpec, dir: &Path) {
        let artifacts = spec
            .files
            .iter()
            .map(|f| format!("{}.exec", f.name))
            .chain(spec.inputs.keys().cloned());

        for name in artifacts {
            if let Err(e) = self.fs.remove_file(&dir.join(&name)) {
                warn!(file = %name, error = %e, "could not remove build artifact");
            }
        }
    }
}
