use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::{ChildStderr, ChildStdout},
};

/// A child's output pipes; each is `None` once it reached EOF.
#[derive(Debug)]
pub(crate) struct OutputStreams {
    pub(crate) stdout: Option<ChildStdout>,
    pub(crate) stderr: Option<ChildStderr>,
}

impl OutputStreams {
    pub(crate) fn new(stdout: ChildStdout, stderr: ChildStderr) -> Self {
        Self {
            stdout: Some(stdout),
            stderr: Some(stderr),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }

    /// Stop reading and close both pipes.
    pub(crate) fn close(&mut self) {
        self.stdout.take();
        self.stderr.take();
    }
}

/// Read one chunk, or pend forever if the pipe is already gone.
pub(crate) async fn read_chunk<R>(reader: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read(buf).await,
        None => std::future::pending().await,
    }
}
