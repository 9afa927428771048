use std::path::PathBuf;

use crate::until::error::RunUntilError;

/// Options for a single run.
///
/// A bare pattern converts into a config with default flags, so
/// `run_until("ready", ...)` and `run_until(RunUntilConfig::new("ready"), ...)`
/// are equivalent.
///
/// # Examples
///
/// ```rust
/// use run_until::until::config::RunUntilConfig;
///
/// let config = RunUntilConfig::new("Server listening")
///     .silent(true)
///     .leave_alive(true);
///
/// assert!(config.validate().is_ok());
/// assert!(config.silent);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunUntilConfig {
    /// The literal string to look for in the command output
    pub target_string: String,

    /// Scan output without relaying it to our own stdout/stderr
    pub silent: bool,

    /// Detach instead of killing the child once the target is found
    pub leave_alive: bool,

    /// Explicit path to the `run-until-runner` executable
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub runner: Option<PathBuf>,
}

impl RunUntilConfig {
    pub fn new(target_string: impl Into<String>) -> Self {
        RunUntilConfig {
            target_string: target_string.into(),
            ..Default::default()
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn leave_alive(mut self, leave_alive: bool) -> Self {
        self.leave_alive = leave_alive;
        self
    }

    pub fn runner(mut self, path: impl Into<PathBuf>) -> Self {
        self.runner = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<(), RunUntilError> {
        if self.target_string.is_empty() {
            return Err(RunUntilError::InvalidConfiguration(
                "Target string cannot be empty".to_string(),
            ));
        }
        // Passed through the environment, which cannot hold NUL
        if self.target_string.contains('\0') {
            return Err(RunUntilError::InvalidConfiguration(
                "Target string cannot contain null bytes".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&str> for RunUntilConfig {
    fn from(target_string: &str) -> Self {
        RunUntilConfig::new(target_string)
    }
}

impl From<String> for RunUntilConfig {
    fn from(target_string: String) -> Self {
        RunUntilConfig::new(target_string)
    }
}

/// Immutable input of one run: options plus the command to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub config: RunUntilConfig,
    pub command: String,
    pub args: Vec<String>,
}

impl RunRequest {
    pub fn new<I, S>(config: impl Into<RunUntilConfig>, command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RunRequest {
            config: config.into(),
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), RunUntilError> {
        self.config.validate()?;

        if self.command.trim().is_empty() {
            return Err(RunUntilError::InvalidConfiguration(
                "Command cannot be empty".to_string(),
            ));
        }
        if self.command.contains('\0') {
            return Err(RunUntilError::InvalidConfiguration(
                "Command cannot contain null bytes".to_string(),
            ));
        }
        for arg in &self.args {
            if arg.contains('\0') {
                return Err(RunUntilError::InvalidConfiguration(format!(
                    "Argument '{}' cannot contain null bytes",
                    arg.escape_debug()
                )));
            }
        }
        Ok(())
    }
}

/// Which of the child's output streams a chunk came from.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamSource {
    #[default]
    Stdout = 0,
    Stderr = 1,
}
