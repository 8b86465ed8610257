use std::collections::BTreeMap;
use std::path::PathBuf;

use gradefleet::config::spec::{OneOrMany, RawFileOptions, TruncateSetting};
use gradefleet::config::{ConfigFile, RawConfigFile, RawTestSpec, TestSpec};

/// Fluent builder for [`TestSpec`], going through the same validation as a
/// spec file on disk.
#[derive(Debug, Default)]
pub struct SpecBuilder {
    raw: RawTestSpec,
}

impl SpecBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file and its build steps, in order.
    pub fn file(mut self, name: &str, steps: &[&str]) -> Self {
        let steps = OneOrMany::Many(steps.iter().map(|s| s.to_string()).collect());
        self.raw.files.push(BTreeMap::from([(name.to_string(), steps)]));
        self
    }

    pub fn tests(mut self, file: &str, tests: &[&str]) -> Self {
        self.raw.tests.insert(
            file.to_string(),
            OneOrMany::Many(tests.iter().map(|s| s.to_string()).collect()),
        );
        self
    }

    pub fn input(mut self, name: &str, contents: &str) -> Self {
        self.raw.inputs.insert(name.to_string(), contents.to_string());
        self
    }

    fn options(&mut self, file: &str) -> &mut RawFileOptions {
        self.raw.options.entry(file.to_string()).or_default()
    }

    pub fn timeout_secs(mut self, file: &str, secs: f64) -> Self {
        self.options(file).timeout = Some(secs);
        self
    }

    pub fn truncate_after(mut self, file: &str, bytes: usize) -> Self {
        self.options(file).truncate_after = Some(bytes);
        self
    }

    pub fn truncate_contents(mut self, file: &str, bytes: usize) -> Self {
        self.options(file).truncate_contents = Some(TruncateSetting::Bytes(bytes));
        self
    }

    pub fn raw(self) -> RawTestSpec {
        self.raw
    }

    pub fn build(self) -> TestSpec {
        TestSpec::try_from(self.raw).expect("SpecBuilder produced an invalid spec")
    }
}

/// Builder for a validated [`ConfigFile`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    raw: RawConfigFile,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote(mut self, remote: &str) -> Self {
        self.raw.config.remote = remote.to_string();
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.raw.config.workers = workers;
        self
    }

    pub fn min_folder_size(mut self, bytes: u64) -> Self {
        self.raw.config.min_folder_size = bytes;
        self
    }

    pub fn students_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.raw.config.students_dir = dir.into();
        self
    }

    pub fn section(mut self, name: &str, students: &[&str]) -> Self {
        self.raw.students.insert(
            name.to_string(),
            students.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn alias(mut self, folder: &str, ids: &[&str]) -> Self {
        self.raw
            .aliases
            .get_or_insert_with(BTreeMap::new)
            .insert(folder.to_string(), ids.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.raw).expect("ConfigBuilder produced an invalid config")
    }
}
