/// Exact, case-sensitive byte substring test against one output chunk.
///
/// Matching never spans chunk boundaries: a pattern split across two reads
/// is not detected. Chunk boundaries come from the OS, so callers should not
/// rely on a pattern being split or kept whole.
#[derive(Debug, Clone)]
pub struct ChunkMatcher {
    pattern: Vec<u8>,
}

impl ChunkMatcher {
    pub fn new(pattern: impl AsRef<[u8]>) -> Self {
        Self {
            pattern: pattern.as_ref().to_vec(),
        }
    }

    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Returns `true` when `chunk` contains the pattern.
    ///
    /// An empty pattern never matches; configuration validation rejects it
    /// before a run starts.
    pub fn is_match(&self, chunk: &[u8]) -> bool {
        let needle = self.pattern.as_slice();
        if needle.is_empty() || chunk.len() < needle.len() {
            return false;
        }
        chunk.windows(needle.len()).any(|window| window == needle)
    }
}
