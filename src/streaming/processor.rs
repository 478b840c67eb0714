//! Chunk accumulation
//!
//! Assembles streamed fragments into the final text, with an optional buffer
//! limit guarding against runaway generations.

use crate::error::AiError;

/// Accumulates streamed chunks in order.
#[derive(Debug, Default)]
pub struct ChunkAccumulator {
    buffer: String,
    chunks: usize,
    max_buffer_bytes: Option<usize>,
}

impl ChunkAccumulator {
    pub fn new(max_buffer_bytes: Option<usize>) -> Self {
        Self {
            buffer: String::new(),
            chunks: 0,
            max_buffer_bytes,
        }
    }

    /// Append a chunk. Fails once the buffer limit would be exceeded.
    pub fn push(&mut self, chunk: &str) -> Result<(), AiError> {
        if let Some(limit) = self.max_buffer_bytes {
            let attempted = self.buffer.len() + chunk.len();
            if attempted > limit {
                tracing::warn!(limit, attempted, "stream buffer limit exceeded");
                return Err(AiError::ExecutionFailed(format!(
                    "streamed output exceeded {limit} bytes"
                )));
            }
        }
        self.buffer.push_str(chunk);
        self.chunks += 1;
        Ok(())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn into_text(self) -> String {
        self.buffer
    }
}
