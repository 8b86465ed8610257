// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::model::{ConfigFile, RawConfigFile, WorkspacePaths};
use crate::config::spec::{RawTestSpec, SpecSet, TestSpec};
use crate::errors::{GradeError, Result};

/// Load the global config file and return the raw, unvalidated form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Load and validate the global config.
///
/// When `optional` is set (the user did not name a config explicitly), a
/// missing file yields the built-in defaults instead of an error.
pub fn load_and_validate(path: impl AsRef<Path>, optional: bool) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw = match load_from_path(path) {
        Ok(raw) => raw,
        Err(GradeError::IoError(e)) if optional && e.kind() == ErrorKind::NotFound => {
            debug!(path = ?path, "no config file; using defaults");
            RawConfigFile::default()
        }
        Err(e) => return Err(e),
    };
    ConfigFile::try_from(raw)
}

/// Parse and check one assignment spec from TOML text.
pub fn parse_spec(contents: &str) -> Result<TestSpec> {
    let raw: RawTestSpec = toml::from_str(contents)?;
    TestSpec::try_from(raw)
}

/// Load `<specs_dir>/<id>.toml` for every requested assignment.
///
/// A missing or malformed spec aborts the whole run: it is an operator
/// mistake, not something a single student caused.
pub fn load_specs(paths: &WorkspacePaths, assignments: &[String]) -> Result<SpecSet> {
    let mut specs = SpecSet::new();
    for id in assignments {
        let path = paths.spec_path(id);
        let contents = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GradeError::SpecNotFound {
                    id: id.clone(),
                    path,
                });
            }
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            warn!(assignment = %id, path = ?path, "spec file is empty; nothing will be built");
        }
        let spec = parse_spec(&contents).map_err(|e| {
            GradeError::ConfigError(format!("invalid spec {}: {e}", path.display()))
        })?;
        specs.insert(id.clone(), spec);
    }
    Ok(specs)
}

/// Project root for a config path: its parent directory, or the current
/// directory for a bare filename. Always absolute when the current
/// directory can be determined, since child processes run elsewhere.
pub fn config_root_dir(config_path: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
        _ => cwd,
    }
}
