use std::process::{ExitStatus, Stdio};

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};

use crate::until::{error::RunUntilError, process::process_group::ProcessGroup};

/// Exclusive handle on a spawned child and its process group.
///
/// The handle is destroyed exactly once, by [`terminate`](Self::terminate) or
/// [`detach`](Self::detach); both consume it. A handle dropped while the child
/// may still be running (the owning future was dropped, or the owner is
/// unwinding) terminates the group, so no descendant outlives its owner by
/// accident.
#[derive(Debug)]
pub struct ChildHandle {
    process_id: u32,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    group: ProcessGroup,
    exited: bool,
}

impl ChildHandle {
    /// Spawn `cmd` in a new process group with piped stdout/stderr.
    ///
    /// Returns the handle and the two output pipes; the caller owns reading them.
    pub fn spawn(
        cmd: Command,
        stdin: Stdio,
    ) -> Result<(Self, ChildStdout, ChildStderr), RunUntilError> {
        let mut group = ProcessGroup::new();
        let mut cmd = group
            .create_with_command(cmd)
            .map_err(|e| RunUntilError::Handle(e.to_string()))?;
        cmd.stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        let mut child = cmd.spawn().map_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "Failed to spawn child process");
            RunUntilError::IO(format!("Failed to spawn child process: {}", e))
        })?;

        let Some(process_id) = child.id() else {
            let _ = child.start_kill();
            return Err(RunUntilError::Handle("Failed to get process id".to_string()));
        };

        #[cfg(unix)]
        if let Err(e) = group.assign_child(process_id) {
            let _ = child.start_kill();
            return Err(RunUntilError::Handle(format!(
                "Failed to add process to group: {}",
                e
            )));
        }

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // From here on, an early return drops the handle and kills the group
        let handle = Self {
            process_id,
            child: Some(child),
            stdin,
            group,
            exited: false,
        };
        let stdout = stdout.ok_or_else(|| {
            RunUntilError::Handle("Failed to take stdout of child process".to_string())
        })?;
        let stderr = stderr.ok_or_else(|| {
            RunUntilError::Handle("Failed to take stderr of child process".to_string())
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(process_id, "Child process spawned");

        Ok((handle, stdout, stderr))
    }

    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Wait for the child to exit.
    pub async fn wait(&mut self) -> Result<ExitStatus, RunUntilError> {
        let Some(child) = self.child.as_mut() else {
            return Err(RunUntilError::Handle("Child process already released".to_string()));
        };
        let status = child
            .wait()
            .await
            .map_err(|e| RunUntilError::IO(format!("Failed to wait for child process: {}", e)))?;
        self.exited = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(process_id = self.process_id, exit_code = ?status.code(), "Child process exited");

        Ok(status)
    }

    /// Ask the child's whole process group to terminate, keeping the handle.
    ///
    /// The caller is expected to keep waiting for the exit.
    pub fn signal_terminate(&mut self) -> Result<(), RunUntilError> {
        if self.exited {
            return Ok(());
        }
        if self.group.is_active() {
            return self
                .group
                .terminate_group()
                .map_err(|e| RunUntilError::Signal(e.to_string()));
        }
        match self.child.as_mut() {
            Some(child) => child
                .start_kill()
                .map_err(|e| RunUntilError::Signal(format!("Failed to kill child process: {}", e))),
            None => Ok(()),
        }
    }

    /// Kill the child's process group and release the handle.
    ///
    /// The exit status is reaped in the background.
    pub fn terminate(mut self) {
        if let Err(_e) = self.signal_terminate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(process_id = self.process_id, error = %_e, "Failed to terminate child process");
        }
        self.release();
    }

    /// Leave the child running and give up ownership of it.
    ///
    /// Stdin is closed; the child keeps its own standard streams and is no
    /// longer tied to this process. Returns the child's process id.
    pub fn detach(mut self) -> u32 {
        #[cfg(feature = "tracing")]
        tracing::debug!(process_id = self.process_id, "Detaching child process");

        self.stdin.take();
        self.release();
        self.process_id
    }

    fn release(&mut self) {
        // Dropping a tokio Child without kill_on_drop leaves the process
        // running and hands reaping to the runtime.
        self.child.take();
        self.stdin.take();
    }
}

impl Drop for ChildHandle {
    fn drop(&mut self) {
        if self.child.is_none() || self.exited {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(process_id = self.process_id, "Child handle dropped while running; terminating");

        let _ = self.signal_terminate();
    }
}

/// Check whether a process with `pid` currently exists.
///
/// A zombie (exited but not yet reaped) still counts as existing.
#[cfg(unix)]
pub fn process_exists(pid: u32) -> bool {
    use nix::errno::Errno;
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let pid = pid as i32;
    if pid <= 0 {
        return false;
    }
    match kill(Pid::from_raw(pid), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
