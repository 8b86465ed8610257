mod common;

use std::path::PathBuf;
use std::time::Duration;

use gradefleet::exec::CommandResult;
use gradefleet::fs::mock::MockFileSystem;
use gradefleet::fs::RealFileSystem;
use gradefleet::report::Interpreter;
use gradefleet_test_utils::builders::SpecBuilder;
use gradefleet_test_utils::fake_runner::FakeRunner;
use gradefleet_test_utils::{init_tracing, with_timeout};

use common::interpreter;

fn dir() -> PathBuf {
    PathBuf::from("/work/students/alice/hw1")
}

#[tokio::test]
async fn missing_file_lists_directory_and_stops() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("other.txt"), "hi");
    fs.add_file(dir().join("Makefile"), "all:");
    let runner = FakeRunner::new();

    let spec = SpecBuilder::new()
        .file("tiny.cpp", &["g++ $@ -o $@.exec"])
        .tests("tiny.cpp", &["$@.exec"])
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.starts_with("### tiny.cpp\n\n"));
    assert!(report.contains("**the file tiny.cpp does not exist**"));
    assert!(report.contains("`ls .` says that these files exist:\n\n    Makefile\n    other.txt"));
    assert!(!report.contains("warnings"));
    assert!(!report.contains("results of"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn failed_build_skips_tests() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("tiny.cpp"), "int main() { return 0 }");
    let runner = FakeRunner::new().on("g++", CommandResult::failure(1, "error: expected ';'\n"));

    let spec = SpecBuilder::new()
        .file("tiny.cpp", &["g++ $@ -o $@.exec", "strip $@.exec"])
        .tests("tiny.cpp", &["$@.exec", "echo 5 | $@.exec"])
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.contains("**contents of tiny.cpp**\n\n    int main() { return 0 }"));
    assert!(report.contains("**warnings: `g++ tiny.cpp -o tiny.cpp.exec`**\n\n    error: expected ';'"));
    assert!(!report.contains("results of"));
    assert_eq!(runner.count("strip"), 0);
    assert_eq!(runner.count("echo"), 0);
    assert_eq!(runner.count("./tiny.cpp.exec"), 0);
}

#[tokio::test]
async fn file_without_build_steps_runs_no_tests() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("README.md"), "# notes");
    let runner = FakeRunner::new();

    let spec = SpecBuilder::new()
        .file("README.md", &[])
        .tests("README.md", &["cat $@"])
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.contains("**contents of README.md**"));
    assert!(!report.contains("results of"));
    assert_eq!(runner.count("cat"), 0);
}

#[tokio::test]
async fn tests_run_with_piped_setup_output() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("tiny.cpp"), "int main() {}");
    let runner = FakeRunner::new()
        .on("git log", CommandResult::success("Fri Oct 9 17:59:01 2026 -0500"))
        .on("echo 5", CommandResult::success("5\n"))
        .on("./tiny.cpp.exec", CommandResult::success("25\n"));

    let spec = SpecBuilder::new()
        .file("tiny.cpp", &["g++ $@ -o $@.exec"])
        .tests("tiny.cpp", &["echo 5 | $@.exec"])
        .timeout_secs("tiny.cpp", 1.5)
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.starts_with("### tiny.cpp (Fri Oct 9 17:59:01 2026 -0500)\n\n"));
    assert!(report.contains("**no warnings: `g++ tiny.cpp -o tiny.cpp.exec`**"));
    assert!(report.contains("**results of `echo 5 | $@.exec`** (status: success)\n\n    25\n"));

    let measured = runner
        .calls()
        .into_iter()
        .find(|c| c.program() == "./tiny.cpp.exec")
        .expect("measured command ran");
    assert_eq!(measured.input.as_deref(), Some(b"5\n".as_slice()));
    assert_eq!(measured.timeout, Some(Duration::from_secs_f64(1.5)));
    assert_eq!(measured.cwd, dir());

    let setup = runner.calls().into_iter().find(|c| c.program() == "echo").unwrap();
    assert_eq!(setup.timeout, None);
    assert_eq!(setup.input, None);
}

#[tokio::test]
async fn timeout_is_reported_as_status() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("loop.cpp"), "while(1);");
    let runner =
        FakeRunner::new().on("./loop.cpp.exec", CommandResult::timeout("still going\n"));

    let spec = SpecBuilder::new()
        .file("loop.cpp", &["g++ $@ -o $@.exec"])
        .tests("loop.cpp", &["$@.exec"])
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.contains("**results of `$@.exec`** (status: timeout)\n\n    still going"));
}

#[tokio::test]
async fn long_output_is_truncated_with_notice() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("big.cpp"), "...");
    let runner = FakeRunner::new().on("./big.cpp.exec", CommandResult::success("abcdefghij"));

    let spec = SpecBuilder::new()
        .file("big.cpp", &["g++ $@ -o $@.exec"])
        .tests("big.cpp", &["$@.exec"])
        .truncate_after("big.cpp", 5)
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.contains("(status: success; output truncated after 5 bytes)"));
    assert!(report.contains("    abcde\n"));
    assert!(!report.contains("abcdef"));
}

#[tokio::test]
async fn contents_truncation_respects_char_boundaries() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("notes.txt"), "héllo wörld");
    let runner = FakeRunner::new();

    let spec = SpecBuilder::new()
        .file("notes.txt", &[])
        .truncate_contents("notes.txt", 2)
        .build();

    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    // 'é' is two bytes, so only "h" fits in two bytes
    assert!(report.contains("**contents of notes.txt**\n\n    h\n"));
    assert!(!report.contains("hé"));
}

#[tokio::test]
async fn rendering_twice_gives_identical_reports() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("tiny.cpp"), "int main() {}");
    let runner = FakeRunner::new()
        .on("g++", CommandResult::success("warning: unused\n"))
        .on("./tiny.cpp.exec", CommandResult::failure(1, "bad\n"));

    let spec = SpecBuilder::new()
        .file("tiny.cpp", &["g++ $@ -o $@.exec"])
        .tests("tiny.cpp", &["$@.exec"])
        .build();
    let interp = interpreter(&runner, &fs);

    let first = interp.process_file(&spec.files[0], &spec, &dir()).await;
    let second = interp.process_file(&spec.files[0], &spec, &dir()).await;
    assert_eq!(first, second);
    assert!(first.contains("**warnings: `g++ tiny.cpp -o tiny.cpp.exec`**"));
    assert!(first.contains("(status: failure)"));
}

#[tokio::test]
async fn assignment_report_writes_fixtures_and_cleans_up() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("tiny.cpp"), "int main() {}");
    fs.add_file(dir().join("tiny.cpp.exec"), "ELF");
    let runner = FakeRunner::new();

    let spec = SpecBuilder::new()
        .file("tiny.cpp", &["g++ $@ -o $@.exec"])
        .file("extra.cpp", &["g++ $@"])
        .input("numbers.txt", "1 2 3\n")
        .build();

    let branches = vec!["origin/feature".to_string()];
    let report = interpreter(&runner, &fs)
        .render_assignment("hw1", "alice", &spec, &dir(), Some(&branches))
        .await;

    assert!(report.starts_with("# hw1 — alice\n\nUnmerged branches:\n    origin/feature\n"));
    let tiny = report.find("### tiny.cpp").unwrap();
    let extra = report.find("### extra.cpp").unwrap();
    assert!(tiny < extra, "fragments follow spec file order");
    assert!(report.contains("**the file extra.cpp does not exist**"));
    assert!(report.contains("    numbers.txt"), "fixture is present during the run");

    assert_eq!(fs.contents(dir().join("numbers.txt")), None);
    assert_eq!(fs.contents(dir().join("tiny.cpp.exec")), None);
    assert!(fs.contents(dir().join("tiny.cpp")).is_some());
}

#[tokio::test]
async fn whitespace_only_build_output_is_not_clean() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("tiny.cpp"), "int main() {}");
    let runner = FakeRunner::new().on("g++", CommandResult::success("\n"));

    let spec = SpecBuilder::new().file("tiny.cpp", &["g++ $@"]).build();
    let report = interpreter(&runner, &fs)
        .process_file(&spec.files[0], &spec, &dir())
        .await;

    assert!(report.contains("**warnings: `g++ tiny.cpp`**"));
    assert!(!report.contains("no warnings"));
}

#[tokio::test]
async fn fixtures_are_removed_when_a_later_fixture_fails() {
    let fs = MockFileSystem::new();
    fs.add_file(dir().join("tiny.cpp"), "int main() {}");
    fs.add_dir(dir().join("b.txt"));
    let runner = FakeRunner::new();

    let spec = SpecBuilder::new()
        .file("tiny.cpp", &["g++ $@"])
        .input("a.txt", "first\n")
        .input("b.txt", "second\n")
        .build();

    let report = interpreter(&runner, &fs)
        .render_assignment("hw1", "alice", &spec, &dir(), None)
        .await;

    assert!(report.starts_with("# hw1 — alice\n\n"));
    assert!(report.contains("writing input fixture b.txt"));
    assert_eq!(fs.contents(dir().join("a.txt")), None);
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn file_removed_by_earlier_test_is_reported() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("victim.txt"), "bye\n").unwrap();

    let runner = std::sync::Arc::new(gradefleet::exec::ProcessRunner);
    let git = gradefleet::vcs::Git::new(runner.clone(), "master");
    let interp = Interpreter::new(runner, std::sync::Arc::new(RealFileSystem), git);

    let spec = SpecBuilder::new()
        .file("victim.txt", &["true"])
        .tests("victim.txt", &["rm $@", "cat $@"])
        .build();

    let report =
        with_timeout(interp.process_file(&spec.files[0], &spec, tmp.path())).await;

    assert!(report.contains("**no warnings: `true`**"));
    assert!(report.contains("**results of `rm $@`** (status: success)"));
    assert!(report.contains("victim.txt could not be found."));
    assert!(!report.contains("**results of `cat $@`**"));
}
