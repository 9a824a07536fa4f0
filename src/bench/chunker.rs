use crate::error::{RagBenchError, Result};

/// Chunking policy: fixed character windows with overlap.
#[derive(Debug, Clone)]
pub struct ChunkingPolicy {
    /// Informational label; a single windowing algorithm is implemented
    /// regardless of its value.
    pub strategy: String,
    /// Window length in characters.
    pub chunk_size: usize,
    /// Characters shared between adjacent windows.
    pub overlap: usize,
}

impl ChunkingPolicy {
    /// Characters the window start advances between chunks.
    pub fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Reject degenerate policies (non-positive stride) before any chunking.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagBenchError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagBenchError::Config(format!(
                "overlap ({}) must be less than chunk_size ({}): the window would never advance",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Split `text` into overlapping windows per `policy`.
///
/// Takes `chunk_size` characters starting every `stride` characters, trims
/// each window, and drops windows that are empty after trimming (order of the
/// survivors is preserved). Pure and deterministic. Sizes are characters, not
/// bytes: slicing always lands on UTF-8 boundaries, so multi-byte scripts are
/// never cut mid-character. The policy must be validated first; the splitter
/// assumes a positive stride.
pub fn split_document(text: &str, policy: &ChunkingPolicy) -> Vec<String> {
    // Byte offset of every character, plus the end sentinel.
    let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    let total = offsets.len();
    let byte_at = |pos: usize| {
        if pos >= total {
            text.len()
        } else {
            offsets[pos]
        }
    };

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total {
        let window = &text[byte_at(start)..byte_at(start + policy.chunk_size)];
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        start += policy.stride();
    }

    chunks
}
