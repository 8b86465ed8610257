#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use gradefleet::config::{ConfigFile, SpecSet};
use gradefleet::fs::mock::MockFileSystem;
use gradefleet::report::Interpreter;
use gradefleet::student::{RunOptions, StudentProcessor};
use gradefleet::vcs::Git;
use gradefleet_test_utils::fake_runner::FakeRunner;

pub const STUDENTS_DIR: &str = "/work/students";

pub fn repo(student: &str) -> PathBuf {
    PathBuf::from(STUDENTS_DIR).join(student)
}

pub fn git(runner: &FakeRunner) -> Git {
    Git::new(Arc::new(runner.clone()), "master")
}

pub fn interpreter(runner: &FakeRunner, fs: &MockFileSystem) -> Interpreter {
    Interpreter::new(Arc::new(runner.clone()), Arc::new(fs.clone()), git(runner))
}

/// A processor over the fake runner and in-memory filesystem.
pub fn processor(
    runner: &FakeRunner,
    fs: &MockFileSystem,
    config: ConfigFile,
    options: RunOptions,
    specs: SpecSet,
) -> StudentProcessor {
    StudentProcessor::new(
        Arc::new(fs.clone()),
        git(runner),
        interpreter(runner, fs),
        Arc::new(config),
        STUDENTS_DIR,
        Arc::new(options),
        Arc::new(specs),
    )
}

/// Put a submitted file of `size` bytes into `student`'s clone.
pub fn submit(fs: &MockFileSystem, student: &str, relative: &str, size: usize) {
    fs.add_file(repo(student).join(relative), vec![b'x'; size]);
}
