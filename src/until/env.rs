//! Environment contract between the supervisor and the child runner.
//!
//! The supervisor sets these variables on the runner process; the runner
//! reads them back at start. Flags are present with the value `"true"` when
//! enabled and absent otherwise.

use tokio::process::Command;

use crate::until::{config::RunUntilConfig, error::RunUntilError};

pub const TARGET_STRING_VAR: &str = "RUN_UNTIL_TARGET_STRING";
pub const SILENT_VAR: &str = "RUN_UNTIL_SILENT";
pub const LEAVE_ALIVE_VAR: &str = "RUN_UNTIL_LEAVE_ALIVE";
/// Overrides where the supervisor looks for the runner executable.
pub const RUNNER_PATH_VAR: &str = "RUN_UNTIL_RUNNER_PATH";
/// File the runner logs to; the runner never logs to stderr.
pub const RUNNER_LOG_VAR: &str = "RUN_UNTIL_RUNNER_LOG";

const FLAG_ON: &str = "true";

/// Settings the child runner receives from its supervisor.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerEnv {
    pub target_string: String,
    pub silent: bool,
    pub leave_alive: bool,
}

impl RunnerEnv {
    /// Read the contract from the current process environment.
    pub fn from_process() -> Result<Self, RunUntilError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the contract through `lookup`, failing if the target is absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunUntilError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let target_string = match lookup(TARGET_STRING_VAR) {
            Some(target) if !target.is_empty() => target,
            _ => return Err(RunUntilError::MissingTarget),
        };
        Ok(RunnerEnv {
            target_string,
            silent: lookup(SILENT_VAR).as_deref() == Some(FLAG_ON),
            leave_alive: lookup(LEAVE_ALIVE_VAR).as_deref() == Some(FLAG_ON),
        })
    }
}

impl From<&RunUntilConfig> for RunnerEnv {
    fn from(config: &RunUntilConfig) -> Self {
        RunnerEnv {
            target_string: config.target_string.clone(),
            silent: config.silent,
            leave_alive: config.leave_alive,
        }
    }
}

/// Set (or clear) the contract variables on a runner command.
///
/// Disabled flags are removed so values inherited from an enclosing run do
/// not leak into this one.
pub fn apply_to_command(cmd: &mut Command, env: &RunnerEnv) {
    cmd.env(TARGET_STRING_VAR, &env.target_string);
    set_flag(cmd, SILENT_VAR, env.silent);
    set_flag(cmd, LEAVE_ALIVE_VAR, env.leave_alive);
}

fn set_flag(cmd: &mut Command, key: &str, on: bool) {
    if on {
        cmd.env(key, FLAG_ON);
    } else {
        cmd.env_remove(key);
    }
}
