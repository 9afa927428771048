use crate::until::{
    process::child::ChildHandle, signal::TerminationSignal, supervisor::Supervisor,
};

impl Supervisor {
    /// Our own process is being interrupted or terminated: take the child down.
    ///
    /// The run keeps going until the child's exit is observed, and then
    /// settles as not found.
    pub(crate) fn handle_termination(
        handle: &mut ChildHandle,
        signal: TerminationSignal,
        terminating: &mut bool,
    ) {
        #[cfg(feature = "tracing")]
        tracing::debug!(?signal, process_id = handle.process_id(), "Terminating child on signal");

        if *terminating {
            return;
        }
        *terminating = true;

        if let Err(_e) = handle.signal_terminate() {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, "Failed to terminate child process");
        }
    }
}
