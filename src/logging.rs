// src/logging.rs

//! Logging setup for `gradefleet` using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen in this order:
//! 1. `--log-level` on the command line, applied to every target
//! 2. `GRADEFLEET_LOG`, parsed as an `EnvFilter` directive string
//!    (e.g. `"debug"` or `"gradefleet::exec=trace,info"`)
//! 3. `warn` when `--quiet` was given, `info` otherwise
//!
//! Everything is written to STDERR so the result table on stdout stays
//! pipeable.

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

const LOG_ENV: &str = "GRADEFLEET_LOG";

/// Initialise the global logging subscriber. Call once, at startup.
pub fn init_logging(cli_level: Option<LogLevel>, quiet: bool) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref(), quiet);

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>, quiet: bool) -> EnvFilter {
    if let Some(lvl) = cli_level {
        return EnvFilter::new(lvl.as_directive());
    }

    if let Some(directives) = env.map(str::trim).filter(|s| !s.is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("ignoring invalid {LOG_ENV}={directives:?}: {e}"),
        }
    }

    EnvFilter::new(if quiet { "warn" } else { "info" })
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
