// src/config/mod.rs

//! Configuration loading and validation for gradefleet.
//!
//! - `model.rs`: the global `gradefleet.toml` (settings, aliases, roster).
//! - `spec.rs`: per-assignment test specifications.
//! - `loader.rs`: reading both from disk.
//! - `validate.rs`: `TryFrom` conversions from the raw to the checked forms.
//! - `roster.rs`: choosing which students a run covers.

pub mod loader;
pub mod model;
pub mod roster;
pub mod spec;
pub mod validate;

pub use loader::{config_root_dir, load_and_validate, load_from_path, load_specs, parse_spec};
pub use model::{ConfigFile, ConfigSection, RawConfigFile, WorkspacePaths};
pub use roster::select_students;
pub use spec::{FileEntry, FileOptions, RawTestSpec, SpecSet, TestSpec};
