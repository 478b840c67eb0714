//! Session-level execution trait and chunk sources

use async_trait::async_trait;
use std::fmt;

use crate::error::ProviderError;
use crate::streaming::ChunkStream;
use crate::types::SessionOutput;
use crate::utils::cancel::AbortHandle;

/// Options forwarded with every execution.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    pub context: Option<String>,
    pub abort: AbortHandle,
}

/// Pull-based chunk reader, the second shape a provider may stream through.
#[async_trait]
pub trait ChunkReader: Send {
    /// Next chunk, or `None` once the stream is exhausted.
    async fn read(&mut self) -> Result<Option<String>, ProviderError>;

    /// Release the reader's lock on the underlying stream.
    fn release_lock(&mut self);
}

/// Streaming output in whichever shape the provider produces it.
///
/// Adapted exactly once into a [`ChunkStream`] by
/// [`crate::streaming::normalize_chunk_source`].
pub enum ChunkSource {
    Stream(ChunkStream),
    Reader(Box<dyn ChunkReader>),
}

impl fmt::Debug for ChunkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("ChunkSource::Stream"),
            Self::Reader(_) => f.write_str("ChunkSource::Reader"),
        }
    }
}

/// A live provider session. Owned by the session manager, which is the only
/// component allowed to call [`ProviderSession::destroy`].
#[async_trait]
pub trait ProviderSession: Send + Sync {
    async fn execute(
        &self,
        input: &str,
        options: ExecuteOptions,
    ) -> Result<SessionOutput, ProviderError>;

    async fn execute_streaming(
        &self,
        _input: &str,
        _options: ExecuteOptions,
    ) -> Result<ChunkSource, ProviderError> {
        Err(ProviderError::named(
            "NotSupportedError",
            "streaming is not supported by this session",
        ))
    }

    /// Release provider resources. Synchronous and idempotent.
    fn destroy(&self);
}
