use std::time::{Duration, Instant};

use gradefleet::exec::{run_command, CommandRunner, CommandStatus, Invocation, ProcessRunner};
use gradefleet_test_utils::{init_tracing, with_timeout};

fn here() -> std::path::PathBuf {
    std::env::current_dir().unwrap()
}

#[tokio::test]
async fn successful_command_captures_stdout() {
    init_tracing();
    let result = with_timeout(run_command(Invocation::new(["echo", "hello"], here()))).await;
    assert_eq!(result.status, CommandStatus::Success);
    assert_eq!(result.exit_code, Some(0));
    assert_eq!(result.output, "hello\n");
}

#[tokio::test]
async fn non_zero_exit_is_failure() {
    let result =
        with_timeout(run_command(Invocation::new(["sh", "-c", "echo nope; exit 3"], here()))).await;
    assert_eq!(result.status, CommandStatus::Failure);
    assert_eq!(result.exit_code, Some(3));
    assert_eq!(result.output, "nope\n");
}

#[tokio::test]
async fn unknown_program_is_missing() {
    let result = with_timeout(run_command(Invocation::new(
        ["definitely-not-a-real-program-xyz"],
        here(),
    )))
    .await;
    assert_eq!(result.status, CommandStatus::Missing);
    assert!(result.output.contains("definitely-not-a-real-program-xyz"));
}

#[tokio::test]
async fn empty_argv_is_missing() {
    let result = run_command(Invocation::new(Vec::<String>::new(), here())).await;
    assert_eq!(result.status, CommandStatus::Missing);
}

#[tokio::test]
async fn input_is_fed_to_stdin() {
    let inv = Invocation::new(["cat"], here()).with_input(Some(b"1 2 3\nfour\n".to_vec()));
    let result = with_timeout(ProcessRunner.run(inv)).await;
    assert!(result.is_success());
    assert_eq!(result.output, "1 2 3\nfour\n");
}

#[tokio::test]
async fn stderr_is_merged_into_output() {
    let inv = Invocation::new(["sh", "-c", "echo oops 1>&2"], here());
    let result = with_timeout(run_command(inv)).await;
    assert!(result.is_success());
    assert_eq!(result.output, "oops\n");
}

#[tokio::test]
async fn slow_command_times_out_and_is_killed() {
    let started = Instant::now();
    let inv = Invocation::new(["sleep", "30"], here()).with_timeout(Duration::from_millis(200));
    let result = with_timeout(run_command(inv)).await;

    assert_eq!(result.status, CommandStatus::Timeout);
    assert_eq!(result.exit_code, None);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn partial_output_survives_a_timeout() {
    let inv = Invocation::new(["sh", "-c", "echo started; exec sleep 30"], here())
        .with_timeout(Duration::from_millis(300));
    let result = with_timeout(run_command(inv)).await;

    assert_eq!(result.status, CommandStatus::Timeout);
    assert_eq!(result.output, "started\n");
}

#[tokio::test]
async fn command_runs_in_the_given_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("marker.txt"), "present").unwrap();

    let result = with_timeout(run_command(Invocation::new(["cat", "marker.txt"], dir.path()))).await;
    assert!(result.is_success());
    assert_eq!(result.output, "present");
}
