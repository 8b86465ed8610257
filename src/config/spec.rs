// src/config/spec.rs

//! Per-assignment test specifications (`specs/<id>.toml`).
//!
//! The raw shape accepts the loose forms people actually write (a single
//! string where a list is expected, `truncate_contents = false`); the checked
//! [`TestSpec`] has exactly one shape for everything, with every command
//! already parsed into a [`CommandTemplate`].

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::template::{CommandTemplate, TestPipeline};

/// Either a single value or a list of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Normalize into a list, dropping blank entries.
    pub fn into_vec(self) -> Vec<String> {
        let items = match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        };
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    }
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// `truncate_contents = false | true | <bytes>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TruncateSetting {
    Enabled(bool),
    Bytes(usize),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFileOptions {
    /// Seconds the measured command may run.
    #[serde(default)]
    pub timeout: Option<f64>,
    #[serde(default)]
    pub truncate_after: Option<usize>,
    #[serde(default)]
    pub truncate_contents: Option<TruncateSetting>,
}

/// A spec file exactly as deserialized.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTestSpec {
    /// Ordered `{ filename = steps }` single-key tables.
    #[serde(default)]
    pub files: Vec<BTreeMap<String, OneOrMany>>,
    #[serde(default)]
    pub options: BTreeMap<String, RawFileOptions>,
    #[serde(default)]
    pub inputs: BTreeMap<String, String>,
    #[serde(default)]
    pub tests: BTreeMap<String, OneOrMany>,
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);
pub const DEFAULT_TRUNCATE_AFTER: usize = 10_000;

/// Effective per-file options after defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileOptions {
    pub timeout: Duration,
    pub truncate_after: usize,
    /// Byte limit for the echoed source, if it should be truncated at all.
    pub truncate_contents: Option<usize>,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            truncate_after: DEFAULT_TRUNCATE_AFTER,
            truncate_contents: None,
        }
    }
}

/// One file to grade and the build steps that prepare it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub steps: Vec<CommandTemplate>,
}

/// Checked, read-only test specification for one assignment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestSpec {
    pub files: Vec<FileEntry>,
    pub options: BTreeMap<String, FileOptions>,
    /// Fixture files written next to the submission before testing.
    pub inputs: BTreeMap<String, String>,
    pub tests: BTreeMap<String, Vec<TestPipeline>>,
}

impl TestSpec {
    pub fn options_for(&self, file: &str) -> FileOptions {
        self.options.get(file).copied().unwrap_or_default()
    }

    pub fn tests_for(&self, file: &str) -> &[TestPipeline] {
        self.tests.get(file).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// All specs requested for one run, keyed by assignment id.
pub type SpecSet = BTreeMap<String, TestSpec>;
