mod common;

use std::collections::BTreeSet;
use std::path::Path;

use gradefleet::config::{SpecSet, TestSpec};
use gradefleet::exec::CommandResult;
use gradefleet::fs::mock::MockFileSystem;
use gradefleet::fs::{FileSystem, RealFileSystem};
use gradefleet::student::{discover, expand_aliases, ResultRow, RowStatus, RunOptions, Submissions};
use gradefleet::types::Snapshot;
use gradefleet::vcs::parse_branch_list;
use gradefleet_test_utils::builders::{ConfigBuilder, SpecBuilder};
use gradefleet_test_utils::fake_runner::FakeRunner;
use gradefleet_test_utils::{init_tracing, with_timeout};

use common::{processor, repo, submit};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn discovers_non_trivial_visible_folders() {
    let fs = MockFileSystem::new();
    let root = Path::new("/r");
    fs.add_file(root.join("hw1/main.cpp"), vec![b'x'; 200]);
    fs.add_file(root.join("hw2/tiny.cpp"), vec![b'x'; 10]);
    fs.add_file(root.join("hw3/a/b/deep.cpp"), vec![b'x'; 150]);
    fs.add_file(root.join(".git/objects/pack"), vec![b'x'; 5000]);
    fs.add_file(root.join("Sound/synth.cpp"), vec![b'x'; 300]);
    fs.add_file(root.join("project/main.cpp"), vec![b'x'; 300]);
    fs.add_file(root.join("notes.txt"), vec![b'x'; 1000]);

    let aliases = gradefleet::config::model::default_aliases();
    let found = discover(&fs, root, 100, &aliases).unwrap();

    assert_eq!(found.homeworks, set(&["hw1", "hw3"]));
    assert_eq!(found.labs, set(&["lab2", "lab3"]));
}

#[test]
fn folder_at_exactly_the_threshold_does_not_count() {
    let fs = MockFileSystem::new();
    fs.add_file("/r/hw1/a.cpp", vec![b'x'; 100]);
    let found = discover(&fs, Path::new("/r"), 100, &Default::default()).unwrap();
    assert!(found.homeworks.is_empty());
}

#[test]
fn symlinks_are_not_followed_when_sizing_folders() {
    let fs = MockFileSystem::new();
    fs.add_file("/r/hw1/main.cpp", vec![b'x'; 60]);
    fs.add_symlink("/r/hw1/self", "/r/hw1");
    fs.add_symlink("/r/hw2", "/r/hw1");

    assert_eq!(fs.dir_size(Path::new("/r/hw1")).unwrap(), 60);
    let found = discover(&fs, Path::new("/r"), 50, &Default::default()).unwrap();
    assert_eq!(found.homeworks, set(&["hw1"]));
}

#[cfg(unix)]
#[test]
fn self_referential_links_in_a_real_repo_are_skipped() {
    use std::os::unix::fs::symlink;

    let tmp = tempfile::tempdir().unwrap();
    let hw1 = tmp.path().join("hw1");
    std::fs::create_dir_all(&hw1).unwrap();
    std::fs::write(hw1.join("main.cpp"), vec![b'x'; 500]).unwrap();
    symlink(".", hw1.join("a")).unwrap();
    symlink(".", hw1.join("b")).unwrap();
    symlink("..", hw1.join("up")).unwrap();
    symlink("hw1", tmp.path().join("lab1")).unwrap();

    assert_eq!(RealFileSystem.dir_size(&hw1).unwrap(), 500);

    let found = discover(&RealFileSystem, tmp.path(), 100, &Default::default()).unwrap();
    assert_eq!(found.homeworks, set(&["hw1"]));
    assert!(found.labs.is_empty());
}

#[test]
fn aliases_expand_case_insensitively() {
    let aliases = gradefleet::config::model::default_aliases();
    let ids = expand_aliases(vec!["IMAGES".to_string(), "hw4".to_string()], &aliases);
    assert_eq!(ids, vec!["lab4", "lab5", "lab6", "hw4"]);
}

#[test]
fn rows_render_as_tab_separated_lines() {
    let ok = ResultRow::completed(
        "alice",
        true,
        Submissions::from_ids(["hw2", "hw1", "lab1", "misc"]),
    );
    assert_eq!(ok.to_string(), "alice !\thw1 hw2\tlab1");
    assert_eq!(ok.homework_count(), 2);

    let clean = ResultRow::completed("bob", false, Submissions::default());
    assert_eq!(clean.to_string(), "bob\t\t");

    let failed = ResultRow::failed("carol", "could not clone");
    assert!(failed.is_failed());
    assert_eq!(failed.to_string(), "carol: could not clone");
}

#[test]
fn branch_listing_drops_symbolic_refs_and_primary() {
    let out = "  origin/HEAD -> origin/master\n  origin/feature\n  origin/master\n* origin/wip\n";
    assert_eq!(
        parse_branch_list(out, "origin/master"),
        vec!["origin/feature", "origin/wip"]
    );
}

#[tokio::test]
async fn existing_clone_is_synced_and_scanned() {
    init_tracing();
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    submit(&fs, "alice", "lab1/main.cpp", 200);
    let runner = FakeRunner::new();

    let p = processor(&runner, &fs, ConfigBuilder::new().build(), RunOptions::default(), SpecSet::new());
    let outcome = with_timeout(p.process("alice")).await;

    assert_eq!(outcome.student, "alice");
    assert_eq!(
        outcome.row.status,
        RowStatus::Completed {
            unmerged: false,
            homeworks: set(&["hw1"]),
            labs: set(&["lab1"]),
        }
    );
    assert_eq!(runner.count("git clone"), 0);
    assert_eq!(runner.count("git status --porcelain"), 1);
    assert_eq!(runner.count("git stash"), 0);
    assert_eq!(runner.count("git pull --quiet origin master"), 1);
    assert_eq!(runner.count("git branch --remotes --no-merged origin/master"), 1);
    assert!(runner.calls().iter().all(|c| c.cwd == repo("alice")));
}

#[tokio::test]
async fn dirty_clone_is_stashed_and_cleared_before_pull() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new().on("status --porcelain", CommandResult::success(" M hw1/main.cpp\n"));

    let p = processor(&runner, &fs, ConfigBuilder::new().build(), RunOptions::default(), SpecSet::new());
    p.process("alice").await;

    let lines = runner.command_lines();
    let stash = lines.iter().position(|l| l == "git stash -u").unwrap();
    let clear = lines.iter().position(|l| l == "git stash clear").unwrap();
    let pull = lines.iter().position(|l| l.starts_with("git pull")).unwrap();
    assert!(stash < clear && clear < pull);
}

#[tokio::test]
async fn failed_pull_still_grades_existing_state() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new().on("git pull", CommandResult::failure(1, "fatal: unable to access"));

    let p = processor(&runner, &fs, ConfigBuilder::new().build(), RunOptions::default(), SpecSet::new());
    let outcome = p.process("alice").await;

    assert!(!outcome.row.is_failed());
    assert_eq!(outcome.row.homework_count(), 1);
}

#[tokio::test]
async fn no_update_and_no_check_skip_git_work() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new();

    let options = RunOptions {
        no_update: true,
        no_check: true,
        ..RunOptions::default()
    };
    let p = processor(&runner, &fs, ConfigBuilder::new().build(), options, SpecSet::new());
    let outcome = p.process("alice").await;

    assert_eq!(outcome.row.homework_count(), 1);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn failed_clone_becomes_an_error_row() {
    let fs = MockFileSystem::new();
    fs.add_dir(common::STUDENTS_DIR);
    let runner = FakeRunner::new().on(
        "bob.git",
        CommandResult::failure(128, "fatal: repository not found"),
    );

    let config = ConfigBuilder::new().remote("git@example.edu:course").build();
    let p = processor(&runner, &fs, config, RunOptions::default(), SpecSet::new());
    let outcome = p.process("bob").await;

    assert!(outcome.row.is_failed());
    let line = outcome.row.to_string();
    assert!(line.starts_with("bob: could not clone git@example.edu:course/bob.git"));
    assert!(line.contains("repository not found"));

    let clone = &runner.calls()[0];
    assert_eq!(clone.argv, vec!["git", "clone", "--quiet", "git@example.edu:course/bob.git", "bob"]);
    assert_eq!(clone.cwd, Path::new(common::STUDENTS_DIR));
}

#[tokio::test]
async fn clean_removes_the_clone_first() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new().on("git clone", CommandResult::failure(128, "offline"));

    let options = RunOptions {
        clean: true,
        ..RunOptions::default()
    };
    let p = processor(&runner, &fs, ConfigBuilder::new().build(), options, SpecSet::new());
    let outcome = p.process("alice").await;

    assert!(!fs.exists(&repo("alice")));
    assert_eq!(runner.count("git clone"), 1);
    assert!(outcome.row.is_failed());
}

#[tokio::test]
async fn unmerged_branches_mark_the_row() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new().on(
        "--no-merged",
        CommandResult::success("  origin/HEAD -> origin/master\n  origin/feature\n"),
    );

    let p = processor(&runner, &fs, ConfigBuilder::new().build(), RunOptions::default(), SpecSet::new());
    let outcome = p.process("alice").await;

    assert_eq!(outcome.row.label(), "alice !");
    assert!(outcome.row.to_string().starts_with("alice !\thw1"));
}

#[tokio::test]
async fn snapshot_checks_out_history_and_returns_to_primary() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new().on("rev-list", CommandResult::success("abc123\n"));

    let options = RunOptions {
        snapshot: Snapshot::AsOf("2026-10-09".to_string()),
        ..RunOptions::default()
    };
    let p = processor(&runner, &fs, ConfigBuilder::new().build(), options, SpecSet::new());
    let outcome = p.process("alice").await;
    assert!(!outcome.row.is_failed());

    let lines = runner.command_lines();
    assert!(lines.contains(&"git rev-list -n 1 --before=2026-10-09 18:00 master".to_string()));
    let checkout = lines.iter().position(|l| l == "git checkout abc123 --force --quiet").unwrap();
    let scan = lines.iter().position(|l| l.contains("--no-merged")).unwrap();
    let restore = lines.iter().position(|l| l == "git checkout master --quiet --force").unwrap();
    assert!(checkout < scan && scan < restore);
}

#[tokio::test]
async fn snapshot_without_history_is_an_error_row() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/main.cpp", 200);
    let runner = FakeRunner::new().on("rev-list", CommandResult::success(""));

    let options = RunOptions {
        snapshot: Snapshot::AsOf("2020-01-01".to_string()),
        ..RunOptions::default()
    };
    let p = processor(&runner, &fs, ConfigBuilder::new().build(), options, SpecSet::new());
    let outcome = p.process("alice").await;

    assert!(outcome.row.is_failed());
    assert!(outcome.row.to_string().contains("no commits on master"));
    assert_eq!(runner.count("git checkout"), 0);
}

#[tokio::test]
async fn recorded_assignments_get_reports() {
    let fs = MockFileSystem::new();
    submit(&fs, "alice", "hw1/tiny.cpp", 200);
    let runner = FakeRunner::new().on(
        "--no-merged",
        CommandResult::success("  origin/feature\n"),
    );

    let mut specs = SpecSet::new();
    specs.insert(
        "hw1".to_string(),
        SpecBuilder::new().file("tiny.cpp", &["g++ $@ -o $@.exec"]).build(),
    );
    specs.insert("hw9".to_string(), TestSpec::default());

    let options = RunOptions {
        record: vec!["hw1".to_string(), "hw9".to_string()],
        ..RunOptions::default()
    };
    let p = processor(&runner, &fs, ConfigBuilder::new().build(), options, specs);
    let outcome = p.process("alice").await;

    let hw1 = &outcome.reports["hw1"];
    assert!(hw1.starts_with("# hw1 — alice\n\nUnmerged branches:\n    origin/feature\n"));
    assert!(hw1.contains("**no warnings: `g++ tiny.cpp -o tiny.cpp.exec`**"));
    assert_eq!(outcome.reports["hw9"], "# hw9 — alice\n\n**no submission**\n\n");
}
