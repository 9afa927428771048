//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `RUN_UNTIL_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `warn`
//!
//! The CLI logs to stderr. The child runner never does: its stderr is
//! scanned for the target string, so it only logs to the file named by
//! `RUN_UNTIL_RUNNER_LOG`.

use std::{error::Error, fs::OpenOptions, path::Path, sync::Mutex};

use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable read when no level is given on the command line.
pub const LOG_LEVEL_VAR: &str = "RUN_UNTIL_LOG";

type InitResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Initialise the global subscriber for the CLI, writing to stderr.
pub fn init_logging(cli_level: Option<LogLevel>) -> InitResult {
    fmt()
        .with_max_level(resolve_level(cli_level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
}

/// Initialise the global subscriber for the child runner, appending to `path`.
pub fn init_file_logging(path: impl AsRef<Path>) -> InitResult {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    fmt()
        .with_max_level(resolve_level(None))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
}

fn resolve_level(cli_level: Option<LogLevel>) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var(LOG_LEVEL_VAR)
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::WARN),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

pub(crate) fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
