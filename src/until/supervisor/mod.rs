//! Parent-side lifecycle of a run.
//!
//! The supervisor spawns the child runner, relays and scans its output, and
//! settles the run once: on a match, on the child's exit, or on a fault.

use std::pin::Pin;

use tokio::{
    io::{AsyncWrite, stderr, stdout},
    sync::mpsc,
};

use crate::{
    helper::tracing::MaybeInstrument,
    until::{
        config::{RunRequest, RunUntilConfig, StreamSource},
        error::RunUntilError,
        listener::ListenerRegistry,
        matcher::ChunkMatcher,
        outcome::RunOutcome,
        process::child::ChildHandle,
        state::RunState,
        stream::{OutputStreams, read_chunk},
    },
};

pub(crate) mod handler;
pub(crate) mod spawn;

pub use spawn::{RUNNER_BIN_NAME, resolve_runner};

/// Size of a single read from the child's pipes.
pub(crate) const CHUNK_SIZE: usize = 8 * 1024;

type OutputSink = Pin<Box<dyn AsyncWrite + Send>>;

/// Runs one command until its output contains a target string.
///
/// # Examples
///
/// ```rust,no_run
/// use run_until::until::{config::{RunRequest, RunUntilConfig}, supervisor::Supervisor};
///
/// #[tokio::main]
/// async fn main() {
///     let config = RunUntilConfig::new("listening").leave_alive(true);
///     let request = RunRequest::new(config, "node", ["server.js"]);
///
///     let mut supervisor = Supervisor::new(request);
///     let outcome = supervisor.run().await;
///     std::process::exit(outcome.exit_status());
/// }
/// ```
pub struct Supervisor {
    pub(crate) request: RunRequest,
    pub(crate) state: RunState,
    pub(crate) stdout: OutputSink,
    pub(crate) stderr: OutputSink,
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("request", &self.request)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    /// Create a supervisor relaying to this process's stdout and stderr.
    pub fn new(request: RunRequest) -> Self {
        Self {
            request,
            state: RunState::Idle,
            stdout: Box::pin(stdout()),
            stderr: Box::pin(stderr()),
        }
    }

    /// Relay the child's output to the given writers instead.
    pub fn with_output<O, E>(mut self, stdout: O, stderr: E) -> Self
    where
        O: AsyncWrite + Send + 'static,
        E: AsyncWrite + Send + 'static,
    {
        self.stdout = Box::pin(stdout);
        self.stderr = Box::pin(stderr);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn request(&self) -> &RunRequest {
        &self.request
    }

    /// Run the command and settle on one outcome.
    ///
    /// A supervisor runs once; later calls fault without spawning anything.
    ///
    /// While running, SIGINT and SIGTERM (Ctrl-C on Windows) sent to this
    /// process terminate the child. Once tokio has installed a handler for a
    /// signal it stays installed for the life of the process: after the run
    /// those signals no longer end the process by default. Install your own
    /// handling if the embedding program relies on it.
    pub async fn run(&mut self) -> RunOutcome {
        if self.state != RunState::Idle {
            return RunOutcome::Faulted(RunUntilError::Handle(
                "Supervisor has already run".to_string(),
            ));
        }

        let command = self.request.command.clone();
        let outcome = self.supervise().in_run_span("supervisor", &command).await;
        self.state = outcome.state();
        debug_assert!(self.state.is_terminal());

        #[cfg(feature = "tracing")]
        tracing::debug!(state = ?self.state, exit_status = outcome.exit_status(), "Run settled");

        outcome
    }

    async fn supervise(&mut self) -> RunOutcome {
        if let Err(e) = self.request.validate() {
            #[cfg(feature = "tracing")]
            tracing::error!(error = %e, "Invalid run request");
            return RunOutcome::Faulted(e);
        }

        let cmd = match self.setup_command() {
            Ok(cmd) => cmd,
            Err(e) => return RunOutcome::Faulted(e),
        };
        let (mut handle, child_stdout, child_stderr) =
            match ChildHandle::spawn(cmd, std::process::Stdio::piped()) {
                Ok(spawned) => spawned,
                Err(e) => return RunOutcome::Faulted(e),
            };
        self.state = RunState::Spawned;

        let (signal_tx, mut signal_rx) = mpsc::channel(8);
        let mut listeners = ListenerRegistry::new(signal_tx);
        let mut streams = OutputStreams::new(child_stdout, child_stderr);

        if let Err(e) = listeners.register_all() {
            return self.conclude(handle, &mut listeners, streams, Err(e));
        }

        let matcher = ChunkMatcher::new(&self.request.config.target_string);
        let mut out_buf = vec![0u8; CHUNK_SIZE];
        let mut err_buf = vec![0u8; CHUNK_SIZE];
        let mut terminating = false;

        // The exit is only observed once both pipes are closed, so anything
        // the child wrote before exiting has been scanned.
        loop {
            tokio::select! {
                biased;
                Some(signal) = signal_rx.recv() => {
                    Self::handle_termination(&mut handle, signal, &mut terminating);
                }
                read = read_chunk(&mut streams.stdout, &mut out_buf), if streams.stdout.is_some() => {
                    match self.handle_output(read, &out_buf, StreamSource::Stdout, &matcher).await {
                        Ok(handler::ChunkStatus::Pending) => {}
                        Ok(handler::ChunkStatus::Eof) => streams.stdout = None,
                        Ok(handler::ChunkStatus::Matched) => {
                            return self.conclude(handle, &mut listeners, streams, Ok(()));
                        }
                        Err(e) => return self.conclude(handle, &mut listeners, streams, Err(e)),
                    }
                }
                read = read_chunk(&mut streams.stderr, &mut err_buf), if streams.stderr.is_some() => {
                    match self.handle_output(read, &err_buf, StreamSource::Stderr, &matcher).await {
                        Ok(handler::ChunkStatus::Pending) => {}
                        Ok(handler::ChunkStatus::Eof) => streams.stderr = None,
                        Ok(handler::ChunkStatus::Matched) => {
                            return self.conclude(handle, &mut listeners, streams, Ok(()));
                        }
                        Err(e) => return self.conclude(handle, &mut listeners, streams, Err(e)),
                    }
                }
                status = handle.wait(), if streams.is_closed() => {
                    return Self::handle_exit(status, &mut listeners);
                }
            }
        }
    }
}

/// Run `command` with `args` until `config.target_string` appears in a
/// single chunk of its stdout or stderr.
///
/// `config` can be a bare target string.
///
/// # Errors
///
/// [`RunUntilError::TargetNotFound`] with the child's exit code if the
/// command exits first; any other variant if supervision itself failed.
///
/// # Signals
///
/// The run listens for SIGINT and SIGTERM (Ctrl-C on Windows) on the
/// current process and kills the child when one arrives. The listeners are
/// removed when the run settles, but the signals stay caught for the rest of
/// the process's life, so a later Ctrl-C no longer terminates the program by
/// default. Callers that need the default behaviour back must handle the
/// signals themselves.
///
/// # Examples
///
/// ```rust,no_run
/// use run_until::run_until;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     run_until("ready", "echo", ["ready"]).await?;
///     Ok(())
/// }
/// ```
pub async fn run_until<I, S>(
    config: impl Into<RunUntilConfig>,
    command: impl Into<String>,
    args: I,
) -> Result<(), RunUntilError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = RunRequest::new(config, command, args);
    Supervisor::new(request).run().await.into_result()
}
