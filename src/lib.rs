// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fleet;
pub mod fs;
pub mod logging;
pub mod report;
pub mod student;
pub mod types;
pub mod vcs;

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{config_root_dir, load_and_validate, load_specs, select_students, ConfigFile};
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fleet::{FleetScheduler, NoProgress, ProgressSink, ReportFiles, StderrProgress};
use crate::fs::{FileSystem, RealFileSystem};
use crate::report::Interpreter;
use crate::student::{RunOptions, StudentProcessor};
use crate::types::Snapshot;
use crate::vcs::{resolve_snapshot, Git, CHECKOUT_CUTOFF};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config, roster and spec loading
/// - the git layer and interpreter over the real process runner
/// - the fleet scheduler and its report files
/// - printing the sorted table
pub async fn run(mut args: CliArgs) -> Result<()> {
    let (config_path, explicit_config) = args.config_path();
    let cfg = Arc::new(load_and_validate(&config_path, !explicit_config)?);
    let paths = cfg.paths(&config_root_dir(&config_path));

    args.expand_stdin(read_stdin_lines);

    let students = select_students(&cfg, &args.students, &args.sections())?;
    let record = dedup(&args.record);
    let workers = args.workers.unwrap_or(cfg.config.workers);
    let snapshot = resolve_snapshot(
        args.day.as_deref(),
        args.date.as_deref(),
        chrono::Local::now().date_naive(),
    )?;

    if args.dry_run {
        print_dry_run(&cfg, &students, &record, workers, &snapshot);
        return Ok(());
    }

    let specs = Arc::new(load_specs(&paths, &record)?);

    if let Snapshot::AsOf(day) = &snapshot {
        eprintln!("Checking out {day} at {CHECKOUT_CUTOFF}");
    }

    std::fs::create_dir_all(&paths.students_dir)
        .with_context(|| format!("creating {}", paths.students_dir.display()))?;

    let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner);
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let git = Git::new(Arc::clone(&runner), cfg.config.primary_branch.clone());
    let interpreter = Interpreter::new(Arc::clone(&runner), Arc::clone(&fs), git.clone());

    let options = Arc::new(RunOptions {
        clean: args.clean,
        no_update: args.no_update,
        no_check: args.no_check,
        snapshot,
        record: record.clone(),
    });

    let processor = StudentProcessor::new(
        fs,
        git,
        interpreter,
        Arc::clone(&cfg),
        paths.students_dir.clone(),
        options,
        specs,
    );

    let progress: Arc<dyn ProgressSink> = if args.quiet {
        Arc::new(NoProgress)
    } else {
        Arc::new(StderrProgress)
    };

    let mut reports = ReportFiles::open(&paths, &record)?;
    let scheduler = FleetScheduler::new(processor, workers, progress);
    let mut table = scheduler.run(&students, &mut reports).await?;
    for (id, path) in reports.paths() {
        info!(assignment = id, path = ?path, "wrote report");
    }
    reports.close()?;

    table.sort(args.sort_by);
    if !args.quiet {
        println!("\n{}", table.render());
    }

    Ok(())
}

fn read_stdin_lines() -> Vec<String> {
    std::io::stdin().lock().lines().map_while(|l| l.ok()).collect()
}

/// Keep the first occurrence of each id, in order.
fn dedup(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

/// Simple dry-run output: the resolved plan, no repository is touched.
fn print_dry_run(
    cfg: &ConfigFile,
    students: &[String],
    record: &[String],
    workers: usize,
    snapshot: &Snapshot,
) {
    println!("gradefleet dry-run");
    println!("  config.remote = {}", cfg.config.remote);
    println!("  config.primary_branch = {}", cfg.config.primary_branch);
    println!("  workers = {workers}");
    match snapshot.date() {
        Some(day) => println!("  snapshot = {day} {CHECKOUT_CUTOFF}"),
        None => println!("  snapshot = latest"),
    }
    println!();

    println!("students ({}):", students.len());
    for student in students {
        println!("  - {student} ({})", cfg.clone_url(student));
    }

    if !record.is_empty() {
        println!("record: {}", record.join(" "));
    }

    debug!("dry-run complete (no execution)");
}
