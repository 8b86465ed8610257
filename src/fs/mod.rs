// src/fs/mod.rs

//! Filesystem seam.
//!
//! Everything the interpreter and the student processor do to disk goes
//! through [`FileSystem`], so the report logic can be exercised against
//! [`mock::MockFileSystem`] without touching a real directory.

use std::fmt::Debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// True for a symbolic link itself, without following it.
    fn is_symlink(&self, path: &Path) -> bool;

    /// Return the entries of a directory as full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Size in bytes of a regular file.
    fn len(&self, path: &Path) -> Result<u64>;

    /// Remove a file; a file that is already gone is not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove a directory tree; a directory that is already gone is not an error.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Total size of all regular files below `path`, recursively.
    /// Symlinks are not followed.
    fn dir_size(&self, path: &Path) -> Result<u64> {
        let mut total = 0;
        for entry in self.read_dir(path)? {
            if self.is_symlink(&entry) {
                continue;
            }
            if self.is_dir(&entry) {
                total += self.dir_size(&entry)?;
            } else if self.is_file(&entry) {
                total += self.len(&entry)?;
            }
        }
        Ok(total)
    }

    /// Sorted bare names of the entries in `path`.
    fn list_names(&self, path: &Path) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .read_dir(path)?
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("reading file {:?}", path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        fs::write(path, contents).with_context(|| format!("writing file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            entries.push(entry?.path());
        }
        Ok(entries)
    }

    fn len(&self, path: &Path) -> Result<u64> {
        let meta = fs::symlink_metadata(path).with_context(|| format!("stat {:?}", path))?;
        Ok(meta.len())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        match fs::remove_file(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("removing file {:?}", path))
            }
            _ => Ok(()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                Err(e).with_context(|| format!("removing dir {:?}", path))
            }
            _ => Ok(()),
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating dir {:?}", path))
    }
}
