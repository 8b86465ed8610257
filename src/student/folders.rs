// src/student/folders.rs

//! Working out which assignments a repository contains.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Result;

use crate::fs::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    Homework,
    Lab,
    Other,
}

/// Classify an assignment id by its prefix: `hw*` or `lab*`.
pub fn classify(id: &str) -> AssignmentKind {
    if id.starts_with("hw") {
        AssignmentKind::Homework
    } else if id.starts_with("lab") {
        AssignmentKind::Lab
    } else {
        AssignmentKind::Other
    }
}

/// Completed work found in one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submissions {
    pub homeworks: BTreeSet<String>,
    pub labs: BTreeSet<String>,
}

impl Submissions {
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut found = Self::default();
        for id in ids {
            let id = id.into();
            match classify(&id) {
                AssignmentKind::Homework => {
                    found.homeworks.insert(id);
                }
                AssignmentKind::Lab => {
                    found.labs.insert(id);
                }
                AssignmentKind::Other => {}
            }
        }
        found
    }
}

/// Replace folder names that stand for several assignments with those
/// assignment ids. Names are lowercased first.
pub fn expand_aliases(
    folders: impl IntoIterator<Item = String>,
    aliases: &BTreeMap<String, Vec<String>>,
) -> Vec<String> {
    folders
        .into_iter()
        .map(|f| f.to_lowercase())
        .flat_map(|f| match aliases.get(&f) {
            Some(ids) => ids.clone(),
            None => vec![f],
        })
        .collect()
}

/// Top-level, non-hidden, non-symlinked directories of `repo` holding more than
/// `min_size` bytes, after alias expansion, split into homeworks and labs.
pub fn discover(
    fs: &dyn FileSystem,
    repo: &Path,
    min_size: u64,
    aliases: &BTreeMap<String, Vec<String>>,
) -> Result<Submissions> {
    let mut folders = Vec::new();
    for entry in fs.read_dir(repo)? {
        let Some(name) = entry.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if name.starts_with('.') || fs.is_symlink(&entry) || !fs.is_dir(&entry) {
            continue;
        }
        if fs.dir_size(&entry)? > min_size {
            folders.push(name);
        }
    }

    Ok(Submissions::from_ids(expand_aliases(folders, aliases)))
}
