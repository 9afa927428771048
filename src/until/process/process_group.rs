//! Process group management for killing a whole process tree at once.
//!
//! On unix the spawned process becomes the leader of a new session
//! (`setsid()`), which also detaches it from our controlling terminal.
//! The group is then signalled with `killpg()`.
//!
//! # Example
//!
//! ```rust,no_run
//! use run_until::until::process::process_group::ProcessGroup;
//! use tokio::process::Command;
//!
//! let mut group = ProcessGroup::new();
//! let mut cmd = Command::new("sleep");
//! cmd.arg("10");
//!
//! let mut cmd = group.create_with_command(cmd).unwrap();
//! let child = cmd.spawn().unwrap();
//! group.assign_child(child.id().unwrap()).unwrap();
//! group.terminate_group().unwrap();
//! ```

use thiserror::Error;
use tokio::process::Command;

/// A process group led by one spawned child.
///
/// # Platform Support
/// - **Unix**: new session via `setsid()`, termination via `killpg()`
/// - **Other platforms**: no group; callers fall back to killing the child itself
#[derive(Debug, Default)]
pub struct ProcessGroup {
    #[cfg(unix)]
    process_group_id: Option<i32>,
}

/// Error type for process group operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessGroupError {
    #[error("Failed to create process group: {0}")]
    CreationFailed(String),
    #[error("Failed to assign process to group: {0}")]
    AssignmentFailed(String),
    #[error("Failed to send signal to process group: {0}")]
    SignalFailed(String),
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl ProcessGroup {
    /// Create a new, inactive process group
    ///
    /// ```rust
    /// use run_until::until::process::process_group::ProcessGroup;
    ///
    /// let group = ProcessGroup::new();
    /// assert!(!group.is_active());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a child has been assigned as group leader.
    pub fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.process_group_id.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Configure `command` to start a new session and process group.
    ///
    /// On platforms without process groups the command is returned unchanged.
    pub fn create_with_command(
        &mut self,
        #[allow(unused_mut)] mut command: Command,
    ) -> Result<Command, ProcessGroupError> {
        #[cfg(unix)]
        {
            // SAFETY: setsid is async-signal-safe and touches no parent state
            unsafe {
                command.pre_exec(|| {
                    use nix::unistd::setsid;
                    if setsid().is_err() {
                        return Err(std::io::Error::last_os_error());
                    }
                    Ok(())
                });
            }
            Ok(command)
        }
        #[cfg(not(unix))]
        {
            Ok(command)
        }
    }

    /// Record the spawned child as the group leader.
    ///
    /// With `setsid()` the group id equals the leader's process id.
    pub fn assign_child(&mut self, child_id: u32) -> Result<(), ProcessGroupError> {
        #[cfg(unix)]
        {
            let pgid = child_id as i32;
            if pgid <= 0 {
                return Err(ProcessGroupError::AssignmentFailed(format!(
                    "Invalid process id: {}",
                    child_id
                )));
            }
            self.process_group_id = Some(pgid);
            Ok(())
        }
        #[cfg(not(unix))]
        {
            let _ = child_id;
            Err(ProcessGroupError::UnsupportedPlatform(
                "Process group assignment not available on this platform".to_string(),
            ))
        }
    }

    /// Send SIGTERM to every process in the group.
    ///
    /// A group that no longer exists counts as terminated.
    pub fn terminate_group(&self) -> Result<(), ProcessGroupError> {
        #[cfg(unix)]
        {
            use nix::errno::Errno;
            use nix::sys::signal::{Signal, killpg};
            use nix::unistd::Pid;

            let Some(pgid) = self.process_group_id else {
                return Err(ProcessGroupError::SignalFailed(
                    "No process group ID available".to_string(),
                ));
            };

            match killpg(Pid::from_raw(pgid), Signal::SIGTERM) {
                Ok(_) => Ok(()),
                Err(Errno::ESRCH) => Ok(()),
                Err(Errno::EPERM) => Err(ProcessGroupError::SignalFailed(format!(
                    "Permission denied to terminate process group {}",
                    pgid
                ))),
                Err(e) => Err(ProcessGroupError::SignalFailed(format!(
                    "Failed to send SIGTERM to process group {}: {}",
                    pgid, e
                ))),
            }
        }
        #[cfg(not(unix))]
        {
            Err(ProcessGroupError::UnsupportedPlatform(
                "Process group termination not available on this platform".to_string(),
            ))
        }
    }
}
