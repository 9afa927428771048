//! Per-run ledger of termination-signal listeners.
//!
//! Each run registers its own listeners and removes exactly those when it
//! concludes. Listeners installed by other runs (or unrelated code) in the
//! same process are never touched.

use tokio::{sync::mpsc, task::AbortHandle};

use crate::until::{error::RunUntilError, signal::TerminationSignal};

/// One tracked listener: who it listens on, for what, and how to remove it.
#[derive(Debug)]
pub struct Registration {
    /// Process id of the signal source (the supervising process)
    pub source: u32,
    pub signal: TerminationSignal,
    handle: AbortHandle,
}

impl Registration {
    fn remove(&self) {
        self.handle.abort();
    }
}

/// Listeners registered by one run. Dropping the registry removes them all.
///
/// # Examples
///
/// ```rust,no_run
/// use run_until::until::listener::ListenerRegistry;
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (tx, mut rx) = mpsc::channel(8);
///     let mut listeners = ListenerRegistry::new(tx);
///     listeners.register_all()?;
///
///     if let Some(signal) = rx.recv().await {
///         println!("received {:?}", signal);
///     }
///     listeners.clear();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ListenerRegistry {
    source: u32,
    signal_tx: mpsc::Sender<TerminationSignal>,
    entries: Vec<Registration>,
}

impl ListenerRegistry {
    /// Create an empty registry forwarding deliveries into `signal_tx`.
    pub fn new(signal_tx: mpsc::Sender<TerminationSignal>) -> Self {
        Self {
            source: std::process::id(),
            signal_tx,
            entries: Vec::new(),
        }
    }

    /// Listen for `signal` on the current process.
    pub fn register(&mut self, signal: TerminationSignal) -> Result<(), RunUntilError> {
        let mut listener = signal.listen()?;
        let tx = self.signal_tx.clone();
        let task = tokio::spawn(async move {
            while listener.recv().await.is_some() {
                #[cfg(feature = "tracing")]
                tracing::debug!(?signal, "Termination signal received");

                if tx.send(signal).await.is_err() {
                    break;
                }
            }
        });
        self.track(signal, task.abort_handle());
        Ok(())
    }

    /// Listen for every termination signal the platform delivers.
    pub fn register_all(&mut self) -> Result<(), RunUntilError> {
        for signal in TerminationSignal::all() {
            self.register(*signal)?;
        }
        Ok(())
    }

    pub(crate) fn track(&mut self, signal: TerminationSignal, handle: AbortHandle) {
        self.entries.push(Registration {
            source: self.source,
            signal,
            handle,
        });
    }

    /// Remove this registry's listeners for `signal`. Returns how many were removed.
    pub fn remove(&mut self, signal: TerminationSignal) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            if entry.signal == signal {
                entry.remove();
                false
            } else {
                true
            }
        });
        before - self.entries.len()
    }

    /// Remove every listener this registry registered. Safe to call repeatedly.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(count = self.entries.len(), "Removing termination listeners");

        for entry in self.entries.drain(..) {
            entry.remove();
        }
    }

    pub fn contains(&self, signal: TerminationSignal) -> bool {
        self.entries.iter().any(|entry| entry.signal == signal)
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Drop for ListenerRegistry {
    fn drop(&mut self) {
        self.clear();
    }
}
