mod output;
mod result;
mod terminate;
mod wait;

/// What a read from one of the child's pipes amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkStatus {
    /// Nothing decisive; keep reading
    Pending,
    /// The pipe is closed
    Eof,
    /// The chunk contained the target string
    Matched,
}
