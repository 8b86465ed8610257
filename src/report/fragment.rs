// src/report/fragment.rs

//! Report fragments for one file.
//!
//! A [`FileReport`] collects blocks in the order the interpreter emits them
//! (header, contents, warnings, results) and renders them separated by blank
//! lines. Each method is one kind of block, so the wording of a section lives
//! in exactly one place.

use crate::exec::CommandStatus;

use super::text::indent4;

#[derive(Debug, Default)]
pub struct FileReport {
    blocks: Vec<String>,
}

impl FileReport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, block: String) {
        self.blocks.push(block.trim_end_matches('\n').to_string());
    }

    fn push_code(&mut self, heading: String, body: &str) {
        if body.trim().is_empty() {
            self.push(heading);
        } else {
            self.push(format!("{heading}\n\n{}", indent4(body)));
        }
    }

    pub fn header(&mut self, filename: &str, last_modified: Option<&str>) {
        match last_modified {
            Some(stamp) => self.push(format!("### {filename} ({stamp})")),
            None => self.push(format!("### {filename}")),
        }
    }

    pub fn missing_file(&mut self, filename: &str, listing: &[String]) {
        self.push(format!("**the file {filename} does not exist**"));
        self.push_code("`ls .` says that these files exist:".to_string(), &listing.join("\n"));
    }

    pub fn contents(&mut self, filename: &str, contents: &str) {
        self.push_code(format!("**contents of {filename}**"), contents);
    }

    /// Only a step that printed nothing at all counts as "no warnings";
    /// whitespace-only output still gets a warnings heading.
    pub fn build_output(&mut self, command: &str, output: &str) {
        if output.is_empty() {
            self.push(format!("**no warnings: `{command}`**"));
        } else {
            self.push_code(format!("**warnings: `{command}`**"), output);
        }
    }

    pub fn test_target_missing(&mut self, filename: &str) {
        self.push(format!("{filename} could not be found."));
    }

    /// Results of one test entry. `truncated_at` is set when the output was cut.
    pub fn test_result(
        &mut self,
        test: &str,
        status: CommandStatus,
        truncated_at: Option<usize>,
        output: &str,
    ) {
        let mut annotations = vec![status.to_string()];
        if let Some(limit) = truncated_at {
            annotations.push(format!("output truncated after {limit} bytes"));
        }
        self.push_code(
            format!("**results of `{test}`** (status: {})", annotations.join("; ")),
            output,
        );
    }

    pub fn finish(self) -> String {
        let mut out = self.blocks.join("\n\n");
        out.push_str("\n\n");
        out
    }
}
