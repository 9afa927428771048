use std::process::ExitStatus;

use crate::until::{
    error::RunUntilError, listener::ListenerRegistry, outcome::RunOutcome,
    supervisor::Supervisor,
};

impl Supervisor {
    /// The child exited before the target string showed up.
    pub(crate) fn handle_exit(
        status: Result<ExitStatus, RunUntilError>,
        listeners: &mut ListenerRegistry,
    ) -> RunOutcome {
        listeners.clear();

        match status {
            Ok(status) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(exit_code = ?status.code(), "Child exited before target string was found");
                RunOutcome::NotFound {
                    exit_code: status.code(),
                }
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %e, "Child process wait failed");
                RunOutcome::Faulted(e)
            }
        }
    }
}
