use tokio::io::AsyncWriteExt;

use crate::until::{
    config::StreamSource,
    error::RunUntilError,
    matcher::ChunkMatcher,
    supervisor::{Supervisor, handler::ChunkStatus},
};

impl Supervisor {
    /// Relay a chunk (unless silent) and test it for the target string.
    pub(crate) async fn handle_output(
        &mut self,
        read: std::io::Result<usize>,
        buf: &[u8],
        src: StreamSource,
        matcher: &ChunkMatcher,
    ) -> Result<ChunkStatus, RunUntilError> {
        let len = match read {
            Ok(0) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(?src, "Child stream closed");
                return Ok(ChunkStatus::Eof);
            }
            Ok(len) => len,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {
                return Ok(ChunkStatus::Pending);
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(?src, error = %e, "Error reading child output");
                return Err(RunUntilError::IO(format!(
                    "Error reading {:?} of child process: {}",
                    src, e
                )));
            }
        };
        let chunk = &buf[..len];

        if !self.request.config.silent {
            self.relay(chunk, src).await;
        }

        if matcher.is_match(chunk) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?src, "Target string found");
            return Ok(ChunkStatus::Matched);
        }
        Ok(ChunkStatus::Pending)
    }

    /// Best-effort copy of a chunk to our own stream of the same kind.
    async fn relay(&mut self, chunk: &[u8], src: StreamSource) {
        let sink = match src {
            StreamSource::Stdout => &mut self.stdout,
            StreamSource::Stderr => &mut self.stderr,
        };
        let result = match sink.write_all(chunk).await {
            Ok(()) => sink.flush().await,
            Err(e) => Err(e),
        };
        if let Err(_e) = result {
            #[cfg(feature = "tracing")]
            tracing::trace!(?src, error = %_e, "Failed to relay child output");
        }
    }
}
