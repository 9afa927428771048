use crate::until::error::RunUntilError;

/// Termination signals a run listens for on its own process.
///
/// Only signals the platform actually delivers are used: SIGINT and SIGTERM
/// on unix, Ctrl-C elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    /// Interrupt (Unix: SIGINT, Windows: CTRL_C_EVENT)
    Interrupt,
    /// Terminate (Unix: SIGTERM)
    #[cfg(unix)]
    Terminate,
}

impl TerminationSignal {
    /// Every termination signal deliverable on this platform.
    pub fn all() -> &'static [TerminationSignal] {
        #[cfg(unix)]
        {
            &[TerminationSignal::Interrupt, TerminationSignal::Terminate]
        }
        #[cfg(not(unix))]
        {
            &[TerminationSignal::Interrupt]
        }
    }

    /// Conventional shell exit code for a process ended by this signal.
    pub fn exit_code(&self) -> i32 {
        match self {
            TerminationSignal::Interrupt => 130,
            #[cfg(unix)]
            TerminationSignal::Terminate => 143,
        }
    }

    /// Start listening for this signal on the current process.
    ///
    /// Must be called from within a tokio runtime.
    pub fn listen(self) -> Result<SignalListener, RunUntilError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let kind = match self {
                TerminationSignal::Interrupt => SignalKind::interrupt(),
                TerminationSignal::Terminate => SignalKind::terminate(),
            };
            let inner = signal(kind).map_err(|e| {
                RunUntilError::Signal(format!("Failed to listen for {:?}: {}", self, e))
            })?;
            Ok(SignalListener { inner })
        }
        #[cfg(windows)]
        {
            let inner = tokio::signal::windows::ctrl_c().map_err(|e| {
                RunUntilError::Signal(format!("Failed to listen for {:?}: {}", self, e))
            })?;
            Ok(SignalListener { inner })
        }
        #[cfg(not(any(unix, windows)))]
        {
            Err(RunUntilError::Signal(
                "Signal handling not available on this platform".to_string(),
            ))
        }
    }
}

/// A stream of deliveries of one termination signal.
#[derive(Debug)]
pub struct SignalListener {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
    #[cfg(windows)]
    inner: tokio::signal::windows::CtrlC,
}

impl SignalListener {
    /// Wait for the next delivery. `None` means no more deliveries can arrive.
    pub async fn recv(&mut self) -> Option<()> {
        #[cfg(any(unix, windows))]
        {
            self.inner.recv().await
        }
        #[cfg(not(any(unix, windows)))]
        {
            None
        }
    }
}
