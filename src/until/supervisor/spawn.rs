use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::until::{
    config::RunUntilConfig,
    env::{self, RUNNER_PATH_VAR, RunnerEnv},
    error::RunUntilError,
    supervisor::Supervisor,
};

/// File name of the child runner binary.
pub const RUNNER_BIN_NAME: &str = "run-until-runner";

impl Supervisor {
    /// Build the command that starts the child runner for this request.
    ///
    /// The runner receives the user's command and arguments as argv and the
    /// run options through the environment.
    pub(crate) fn setup_command(&self) -> Result<Command, RunUntilError> {
        let runner = resolve_runner(&self.request.config)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(runner = %runner.display(), command = %self.request.command, args = ?self.request.args, "Spawning child runner");

        let mut cmd = Command::new(runner);
        cmd.arg(&self.request.command).args(&self.request.args);
        env::apply_to_command(&mut cmd, &RunnerEnv::from(&self.request.config));
        Ok(cmd)
    }
}

/// Locate the child runner executable.
///
/// Checked in order: the configured path, `RUN_UNTIL_RUNNER_PATH`, then the
/// directory of the current executable and its parent.
pub fn resolve_runner(config: &RunUntilConfig) -> Result<PathBuf, RunUntilError> {
    if let Some(path) = &config.runner {
        return Ok(path.clone());
    }
    if let Some(path) = std::env::var_os(RUNNER_PATH_VAR) {
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe()
        .map_err(|e| RunUntilError::RunnerNotFound(format!("Cannot locate current executable: {}", e)))?;
    let file_name = format!("{}{}", RUNNER_BIN_NAME, std::env::consts::EXE_SUFFIX);

    // Binaries sit next to each other; test harnesses live one level down in deps/
    exe.parent()
        .into_iter()
        .flat_map(|dir| [Some(dir), dir.parent()])
        .flatten()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| is_file(candidate))
        .ok_or_else(|| {
            RunUntilError::RunnerNotFound(format!(
                "'{}' not found near {}; set {} to its location",
                file_name,
                exe.display(),
                RUNNER_PATH_VAR
            ))
        })
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
