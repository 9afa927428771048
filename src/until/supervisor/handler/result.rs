use crate::until::{
    error::RunUntilError,
    listener::ListenerRegistry,
    outcome::RunOutcome,
    process::child::ChildHandle,
    stream::OutputStreams,
    supervisor::Supervisor,
};

impl Supervisor {
    /// Settle a run that ended by a match (`Ok`) or a fault (`Err`).
    ///
    /// Listeners go first, then the child is killed or, for a match with
    /// `leave_alive`, detached. `handle` is consumed, so this happens once
    /// per run.
    pub(crate) fn conclude(
        &self,
        handle: ChildHandle,
        listeners: &mut ListenerRegistry,
        mut streams: OutputStreams,
        result: Result<(), RunUntilError>,
    ) -> RunOutcome {
        listeners.clear();
        streams.close();

        let process_id = handle.process_id();
        let detached = result.is_ok() && self.request.config.leave_alive;
        if detached {
            handle.detach();
        } else {
            handle.terminate();
        }

        match result {
            Ok(()) => RunOutcome::Matched {
                process_id,
                detached,
            },
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(error = %e, process_id, "Supervision faulted");
                RunOutcome::Faulted(e)
            }
        }
    }
}
