//! The intermediary process between the supervisor and the user's command.
//!
//! The runner starts the command through the shell, relays its output to
//! its own stdout/stderr, and ties the command's lifetime to its own: when
//! the runner is interrupted or terminated the command's process group is
//! killed, and when the command exits the runner exits with its code.

use std::{path::PathBuf, process::ExitStatus, time::Duration};

use tokio::{
    io::{AsyncWrite, stderr, stdout},
    sync::mpsc,
};

use crate::{
    helper::tracing::MaybeInstrument,
    until::{
        env::RunnerEnv,
        error::RunUntilError,
        listener::ListenerRegistry,
        process::child::ChildHandle,
        stream::{OutputStreams, read_chunk},
        supervisor::CHUNK_SIZE,
    },
};

pub mod relay;
pub mod shell;

use relay::{ChunkRelay, FALLBACK_FILE_NAME};

/// How long output is still relayed after the command exited.
///
/// Descendants of the command may keep its pipes open indefinitely.
pub const DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// Exit code used when the runner itself fails.
pub const RUNNER_FAILURE_CODE: i32 = 1;

#[derive(Debug, Clone)]
pub struct ChildRunner {
    env: RunnerEnv,
    command: String,
    args: Vec<String>,
    fallback_path: PathBuf,
}

impl ChildRunner {
    pub fn new(env: RunnerEnv, command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            env,
            command: command.into(),
            args,
            fallback_path: PathBuf::from(FALLBACK_FILE_NAME),
        }
    }

    /// Build a runner from the process environment and `argv` (without the
    /// program name): the first item is the command, the rest its arguments.
    ///
    /// # Errors
    ///
    /// [`RunUntilError::MissingTarget`] if the supervisor did not pass a
    /// target string; this is checked before anything else.
    pub fn from_env<I>(argv: I) -> Result<Self, RunUntilError>
    where
        I: IntoIterator<Item = String>,
    {
        let env = RunnerEnv::from_process()?;
        let mut argv = argv.into_iter();
        let command = argv.next().ok_or_else(|| {
            RunUntilError::InvalidConfiguration("No command given to child runner".to_string())
        })?;
        Ok(Self::new(env, command, argv.collect()))
    }

    /// Where undeliverable stdout chunks are appended. Defaults to `stdout.txt`.
    pub fn fallback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_path = path.into();
        self
    }

    pub fn env(&self) -> &RunnerEnv {
        &self.env
    }

    /// Run the command, relaying to this process's stdout and stderr.
    ///
    /// Returns the exit code the runner should exit with.
    pub async fn run(self) -> Result<i32, RunUntilError> {
        let command = self.command.clone();
        self.run_with_output(stdout(), stderr())
            .in_run_span("runner", &command)
            .await
    }

    /// Run the command, relaying to the given writers.
    pub async fn run_with_output<O, E>(self, stdout: O, stderr: E) -> Result<i32, RunUntilError>
    where
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            command = %self.command,
            args = ?self.args,
            silent = self.env.silent,
            leave_alive = self.env.leave_alive,
            "Starting command"
        );

        let cmd = shell::shell_command(&self.command, &self.args);
        let (mut handle, child_stdout, child_stderr) =
            ChildHandle::spawn(cmd, std::process::Stdio::null())?;

        let (signal_tx, mut signal_rx) = mpsc::channel(4);
        let mut listeners = ListenerRegistry::new(signal_tx);
        listeners.register_all()?;

        let mut streams = OutputStreams::new(child_stdout, child_stderr);
        let mut out_relay = ChunkRelay::with_fallback(stdout, &self.fallback_path);
        let mut err_relay = ChunkRelay::best_effort(stderr);
        let mut out_buf = vec![0u8; CHUNK_SIZE];
        let mut err_buf = vec![0u8; CHUNK_SIZE];

        loop {
            tokio::select! {
                biased;
                Some(signal) = signal_rx.recv() => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(?signal, "Runner terminated; killing command");

                    listeners.clear();
                    handle.terminate();
                    return Ok(signal.exit_code());
                }
                read = read_chunk(&mut streams.stdout, &mut out_buf), if streams.stdout.is_some() => {
                    relay_read(read, &out_buf, &mut streams.stdout, &mut out_relay).await?;
                }
                read = read_chunk(&mut streams.stderr, &mut err_buf), if streams.stderr.is_some() => {
                    relay_read(read, &err_buf, &mut streams.stderr, &mut err_relay).await?;
                }
                status = handle.wait() => {
                    let status = status?;
                    listeners.clear();

                    let drain = drain_streams(
                        &mut streams,
                        (&mut out_buf, &mut out_relay),
                        (&mut err_buf, &mut err_relay),
                    );
                    if let Ok(Err(e)) = tokio::time::timeout(DRAIN_TIMEOUT, drain).await {
                        return Err(e);
                    }
                    return Ok(exit_code_of(&status));
                }
            }
        }
    }
}

/// Relay one read result; closes `reader` at EOF.
async fn relay_read<R, W>(
    read: std::io::Result<usize>,
    buf: &[u8],
    reader: &mut Option<R>,
    relay: &mut ChunkRelay<W>,
) -> Result<(), RunUntilError>
where
    W: AsyncWrite + Unpin,
{
    match read {
        Ok(0) => {
            reader.take();
            Ok(())
        }
        Ok(len) => {
            relay.relay(&buf[..len]).await;
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => Ok(()),
        Err(e) => {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "Error reading command output");
            Err(RunUntilError::IO(format!("Error reading command output: {}", e)))
        }
    }
}

/// Relay whatever is left in the pipes until both reach EOF.
async fn drain_streams<O, E>(
    streams: &mut OutputStreams,
    (out_buf, out_relay): (&mut [u8], &mut ChunkRelay<O>),
    (err_buf, err_relay): (&mut [u8], &mut ChunkRelay<E>),
) -> Result<(), RunUntilError>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            read = read_chunk(&mut streams.stdout, out_buf), if streams.stdout.is_some() => {
                relay_read(read, out_buf, &mut streams.stdout, out_relay).await?;
            }
            read = read_chunk(&mut streams.stderr, err_buf), if streams.stderr.is_some() => {
                relay_read(read, err_buf, &mut streams.stderr, err_relay).await?;
            }
            else => return Ok(()),
        }
    }
}

/// Exit code to propagate for a finished command.
///
/// A command killed by a signal maps to `128 + signal`, as shells report it.
pub fn exit_code_of(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    RUNNER_FAILURE_CODE
}
