// src/fleet/reports.rs

//! Output report files, one per recorded assignment.
//!
//! Files are opened (and truncated) before any student is dispatched and
//! written only from the scheduler, in the order results arrive. Dropping a
//! [`ReportFiles`] closes every file, so an early return still releases them;
//! [`ReportFiles::close`] additionally surfaces flush errors.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use crate::config::WorkspacePaths;
use crate::errors::Result;

#[derive(Debug)]
struct ReportFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

#[derive(Debug, Default)]
pub struct ReportFiles {
    files: BTreeMap<String, ReportFile>,
}

impl ReportFiles {
    /// Create `log-<id>.md` in the logs directory for each assignment.
    pub fn open(paths: &WorkspacePaths, assignments: &[String]) -> Result<Self> {
        let mut files = BTreeMap::new();
        if assignments.is_empty() {
            return Ok(Self { files });
        }

        fs::create_dir_all(&paths.logs_dir)
            .with_context(|| format!("creating {}", paths.logs_dir.display()))?;

        for id in assignments {
            let path = paths.report_path(id);
            let file =
                File::create(&path).with_context(|| format!("opening {}", path.display()))?;
            debug!(assignment = %id, path = ?path, "opened report file");
            files.insert(
                id.clone(),
                ReportFile {
                    path,
                    writer: BufWriter::new(file),
                },
            );
        }

        Ok(Self { files })
    }

    pub fn paths(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.files.iter().map(|(id, f)| (id.as_str(), &f.path))
    }

    /// Append one student's reports. Reports for assignments that have no
    /// open file are ignored.
    pub fn append(&mut self, reports: &BTreeMap<String, String>) -> Result<()> {
        for (id, text) in reports {
            if let Some(file) = self.files.get_mut(id) {
                file.writer
                    .write_all(text.as_bytes())
                    .with_context(|| format!("writing {}", file.path.display()))?;
            }
        }
        Ok(())
    }

    /// Flush and close every file.
    pub fn close(self) -> Result<()> {
        for (_, mut file) in self.files {
            file.writer
                .flush()
                .with_context(|| format!("flushing {}", file.path.display()))?;
        }
        Ok(())
    }
}
