use std::path::{Path, PathBuf};

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Name of the file undeliverable stdout chunks are appended to.
pub const FALLBACK_FILE_NAME: &str = "stdout.txt";

/// Copies chunks to a writer, never failing the caller.
///
/// With a fallback path, a chunk that cannot be written (typically because
/// the supervisor closed the pipe after detaching) is appended to that file
/// instead. Errors from the fallback write are dropped as well.
#[derive(Debug)]
pub struct ChunkRelay<W> {
    writer: W,
    fallback: Option<PathBuf>,
}

impl<W> ChunkRelay<W>
where
    W: AsyncWrite + Unpin,
{
    /// Relay that drops chunks it cannot write.
    pub fn best_effort(writer: W) -> Self {
        Self {
            writer,
            fallback: None,
        }
    }

    /// Relay that appends unwritable chunks to `fallback`.
    pub fn with_fallback(writer: W, fallback: impl Into<PathBuf>) -> Self {
        Self {
            writer,
            fallback: Some(fallback.into()),
        }
    }

    pub async fn relay(&mut self, chunk: &[u8]) {
        let result = match self.writer.write_all(chunk).await {
            Ok(()) => self.writer.flush().await,
            Err(e) => Err(e),
        };
        let Err(_e) = result else {
            return;
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(error = %_e, kind = ?_e.kind(), "Relay write failed");

        if let Some(path) = &self.fallback {
            let _ = append_chunk(path, chunk).await;
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

async fn append_chunk(path: &Path, chunk: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(chunk).await?;
    file.flush().await
}
