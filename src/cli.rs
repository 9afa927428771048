//! Command-line front end.
//!
//! Flags come first, then a literal `--`, then the command and its arguments
//! verbatim:
//!
//! ```text
//! run-until --targetString "listening" --leaveAlive -- npm start
//! ```

use clap::{Parser, ValueEnum};

use crate::until::config::{RunRequest, RunUntilConfig};

/// Command-line arguments for `run-until`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "run-until",
    version,
    about = "Runs a command until a certain string is found in the output.",
    long_about = None
)]
pub struct CliArgs {
    /// String to search for in the output of the command
    #[arg(long = "targetString", visible_alias = "target-string", value_name = "STRING")]
    pub target_string: String,

    /// Whether to suppress output from the command
    #[arg(long)]
    pub silent: bool,

    /// Whether to leave the command running after the target string is found
    #[arg(long = "leaveAlive", visible_alias = "leave-alive")]
    pub leave_alive: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `RUN_UNTIL_LOG` or `warn` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run, followed by its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliArgs {
    pub fn config(&self) -> RunUntilConfig {
        RunUntilConfig::new(self.target_string.clone())
            .silent(self.silent)
            .leave_alive(self.leave_alive)
    }

    pub fn into_request(self) -> RunRequest {
        let config = self.config();
        let mut command = self.command.into_iter();
        let program = command.next().unwrap_or_default();
        RunRequest::new(config, program, command)
    }
}

/// Parse the process arguments, exiting on bad usage.
///
/// Usage errors exit with 1 like any other failure; `--help` and
/// `--version` exit with 0.
pub fn parse() -> CliArgs {
    CliArgs::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        std::process::exit(code)
    })
}
