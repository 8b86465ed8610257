// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration as read from `gradefleet.toml`.
///
/// ```toml
/// [config]
/// remote = "git@stogit.cs.stolaf.edu:sd-s16"
/// primary_branch = "master"
/// workers = 4
///
/// [aliases]
/// sound = ["lab2", "lab3"]
///
/// [students]
/// my = ["rives"]
/// a = ["alice", "bob"]
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// Folder names that stand for several assignment ids.
    ///
    /// `None` means "not given" and selects [`default_aliases`]; an explicit
    /// empty table disables aliasing.
    #[serde(default)]
    pub aliases: Option<BTreeMap<String, Vec<String>>>,

    /// Roster sections, keyed by section name (`my`, `a`, `section-b`, ...).
    #[serde(default)]
    pub students: BTreeMap<String, Vec<String>>,
}

/// Validated configuration. Only constructible through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub aliases: BTreeMap<String, Vec<String>>,
    pub students: BTreeMap<String, Vec<String>>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        aliases: BTreeMap<String, Vec<String>>,
        students: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            config,
            aliases,
            students,
        }
    }

    /// Resolve the configured directories against `root`.
    pub fn paths(&self, root: &Path) -> WorkspacePaths {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };

        WorkspacePaths {
            root: root.to_path_buf(),
            students_dir: resolve(&self.config.students_dir),
            logs_dir: resolve(&self.config.logs_dir),
            specs_dir: resolve(&self.config.specs_dir),
        }
    }

    /// Clone URL for one student's repository.
    pub fn clone_url(&self, student: &str) -> String {
        format!("{}/{}.git", self.config.remote.trim_end_matches('/'), student)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(ConfigSection::default(), default_aliases(), BTreeMap::new())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Base URL that student repositories live under.
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Branch that counts as "submitted" work.
    #[serde(default = "default_primary_branch")]
    pub primary_branch: String,

    /// Default worker count when `--workers` is not given.
    #[serde(default = "default_workers")]
    pub workers: usize,

    #[serde(default = "default_students_dir")]
    pub students_dir: PathBuf,

    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    #[serde(default = "default_specs_dir")]
    pub specs_dir: PathBuf,

    /// Folders whose total size is at or below this many bytes are treated
    /// as empty placeholders.
    #[serde(default = "default_min_folder_size")]
    pub min_folder_size: u64,
}

fn default_remote() -> String {
    "git@stogit.cs.stolaf.edu:sd-s16".to_string()
}

fn default_primary_branch() -> String {
    "master".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_students_dir() -> PathBuf {
    PathBuf::from("students")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_specs_dir() -> PathBuf {
    PathBuf::from("specs")
}

fn default_min_folder_size() -> u64 {
    100
}

/// Lab folders that historically held more than one lab.
pub fn default_aliases() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([
        (
            "sound".to_string(),
            vec!["lab2".to_string(), "lab3".to_string()],
        ),
        (
            "images".to_string(),
            vec!["lab4".to_string(), "lab5".to_string(), "lab6".to_string()],
        ),
    ])
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            primary_branch: default_primary_branch(),
            workers: default_workers(),
            students_dir: default_students_dir(),
            logs_dir: default_logs_dir(),
            specs_dir: default_specs_dir(),
            min_folder_size: default_min_folder_size(),
        }
    }
}

/// Directories the fleet run reads from and writes to, already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePaths {
    pub root: PathBuf,
    pub students_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub specs_dir: PathBuf,
}

impl WorkspacePaths {
    pub fn report_path(&self, assignment: &str) -> PathBuf {
        self.logs_dir.join(format!("log-{assignment}.md"))
    }

    pub fn spec_path(&self, assignment: &str) -> PathBuf {
        self.specs_dir.join(format!("{assignment}.toml"))
    }
}
