use std::future::Future;

#[cfg(feature = "tracing")]
use tracing::{Instrument, Level};

/// Wrap a run's future in a `run_until` span when the `tracing` feature is on.
///
/// Without the feature the future is returned untouched, so call sites need
/// no `cfg` of their own.
pub trait MaybeInstrument: Future + Sized {
    #[cfg(feature = "tracing")]
    fn in_run_span(self, role: &'static str, command: &str) -> impl Future<Output = Self::Output> {
        let span = tracing::span!(Level::DEBUG, "run_until", role = role, command = command);
        self.instrument(span)
    }

    #[cfg(not(feature = "tracing"))]
    fn in_run_span(self, _role: &'static str, _command: &str) -> Self {
        self
    }
}

impl<F: Future> MaybeInstrument for F {}
