// src/config/roster.rs

use std::collections::BTreeSet;

use tracing::warn;

use crate::config::model::ConfigFile;
use crate::errors::{GradeError, Result};

/// Decide which students a run covers.
///
/// Explicit `students` win. Otherwise sections are consulted: `all` selects
/// every section, `my` (the fallback when nothing was asked for) selects the
/// instructor's own list, and any other name matches `section-<name>` or
/// `<name>`. The result is de-duplicated and sorted.
pub fn select_students(
    cfg: &ConfigFile,
    students: &[String],
    sections: &[String],
) -> Result<Vec<String>> {
    let mut selected: BTreeSet<String> = BTreeSet::new();

    if !students.is_empty() {
        selected.extend(students.iter().cloned());
    } else {
        let sections: Vec<&str> = if sections.is_empty() {
            vec!["my"]
        } else {
            sections.iter().map(String::as_str).collect()
        };

        if sections.contains(&"all") {
            selected.extend(cfg.students.values().flatten().cloned());
        } else if sections.contains(&"my") {
            let my = cfg.students.get("my").ok_or_else(|| {
                GradeError::ConfigError("there is no `my` section in [students]".to_string())
            })?;
            selected.extend(my.iter().cloned());
        } else {
            for section in sections {
                let found = cfg
                    .students
                    .get(&format!("section-{section}"))
                    .or_else(|| cfg.students.get(section));
                match found {
                    Some(list) => selected.extend(list.iter().cloned()),
                    None => warn!(section, "section not found in [students]; skipping"),
                }
            }
        }
    }

    selected.retain(|s| !s.trim().is_empty());

    if selected.is_empty() {
        return Err(GradeError::ConfigError(
            "could not find a list of students: pass --students, --section, \
             add a [students] table to the config, or pipe usernames to `--students -`"
                .to_string(),
        ));
    }

    Ok(selected.into_iter().collect())
}
