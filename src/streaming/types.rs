//! Core Streaming Types

use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::error::{AiError, ProviderError};

/// Raw chunk stream as produced by a provider, after normalization.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// One item of a streamed execution.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPart<T> {
    /// An incremental text fragment, in provider order.
    Chunk(String),
    /// The final shaped result. Always the last item of a successful stream.
    Completed(T),
}

impl<T> StreamPart<T> {
    pub fn as_chunk(&self) -> Option<&str> {
        match self {
            Self::Chunk(chunk) => Some(chunk),
            Self::Completed(_) => None,
        }
    }
}

/// Lazy, finite, non-restartable stream of a single execution.
///
/// A cancelled execution ends without a `Completed` part and without an error.
pub type ExecutionStream<T> = Pin<Box<dyn Stream<Item = Result<StreamPart<T>, AiError>> + Send>>;

/// Drain an execution stream and return its completed result.
///
/// A stream that ends without completing (cancellation) yields `AiError::Aborted`.
pub async fn collect_completed<T>(mut stream: ExecutionStream<T>) -> Result<T, AiError> {
    while let Some(part) = stream.next().await {
        if let StreamPart::Completed(result) = part? {
            return Ok(result);
        }
    }
    Err(AiError::Aborted)
}
