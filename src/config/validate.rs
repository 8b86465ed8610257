// src/config/validate.rs

use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::model::{default_aliases, ConfigFile, RawConfigFile};
use crate::config::spec::{
    FileEntry, FileOptions, RawFileOptions, RawTestSpec, TestSpec, TruncateSetting,
};
use crate::errors::{GradeError, Result};
use crate::exec::template::{CommandTemplate, TestPipeline};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = GradeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        let aliases = raw.aliases.unwrap_or_else(default_aliases);
        let aliases = aliases
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(ConfigFile::new_unchecked(raw.config, aliases, raw.students))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.workers == 0 {
        return Err(GradeError::ConfigError(
            "[config].workers must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.config.remote.trim().is_empty() {
        return Err(GradeError::ConfigError(
            "[config].remote must not be empty".to_string(),
        ));
    }
    if cfg.config.primary_branch.trim().is_empty() {
        return Err(GradeError::ConfigError(
            "[config].primary_branch must not be empty".to_string(),
        ));
    }
    if let Some(aliases) = &cfg.aliases {
        for (folder, ids) in aliases {
            if ids.iter().all(|id| id.trim().is_empty()) {
                return Err(GradeError::ConfigError(format!(
                    "alias '{folder}' must expand to at least one assignment id"
                )));
            }
        }
    }
    Ok(())
}

impl TryFrom<RawTestSpec> for TestSpec {
    type Error = GradeError;

    fn try_from(raw: RawTestSpec) -> std::result::Result<Self, Self::Error> {
        let mut files = Vec::with_capacity(raw.files.len());
        for (idx, entry) in raw.files.into_iter().enumerate() {
            if entry.len() != 1 {
                return Err(GradeError::ConfigError(format!(
                    "files[{idx}] must map exactly one filename to its build steps (found {} keys)",
                    entry.len()
                )));
            }
            for (name, steps) in entry {
                let steps = steps
                    .into_vec()
                    .iter()
                    .map(|s| CommandTemplate::parse(s))
                    .collect();
                files.push(FileEntry { name, steps });
            }
        }

        let known = |name: &str| files.iter().any(|f| f.name == name);

        let mut options = BTreeMap::new();
        for (name, opts) in raw.options {
            if !known(&name) {
                return Err(GradeError::ConfigError(format!(
                    "options given for '{name}', which is not listed in `files`"
                )));
            }
            options.insert(name.clone(), file_options(&name, opts)?);
        }

        let mut tests = BTreeMap::new();
        for (name, entries) in raw.tests {
            if !known(&name) {
                return Err(GradeError::ConfigError(format!(
                    "tests given for '{name}', which is not listed in `files`"
                )));
            }
            let pipelines = entries
                .into_vec()
                .iter()
                .map(|t| TestPipeline::parse(t))
                .collect();
            tests.insert(name, pipelines);
        }

        Ok(TestSpec {
            files,
            options,
            inputs: raw.inputs,
            tests,
        })
    }
}

fn file_options(name: &str, raw: RawFileOptions) -> Result<FileOptions> {
    let defaults = FileOptions::default();

    let timeout = match raw.timeout {
        None => defaults.timeout,
        Some(secs) => match Duration::try_from_secs_f64(secs) {
            Ok(timeout) if !timeout.is_zero() => timeout,
            _ => {
                return Err(GradeError::ConfigError(format!(
                    "options.\"{name}\".timeout must be a positive number of seconds (got {secs})"
                )));
            }
        },
    };

    let truncate_after = raw.truncate_after.unwrap_or(defaults.truncate_after);

    let truncate_contents = match raw.truncate_contents {
        None | Some(TruncateSetting::Enabled(false)) => None,
        Some(TruncateSetting::Enabled(true)) => Some(truncate_after),
        Some(TruncateSetting::Bytes(n)) => Some(n),
    };

    Ok(FileOptions {
        timeout,
        truncate_after,
        truncate_contents,
    })
}
