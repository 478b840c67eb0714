//! Chunk source normalization
//!
//! Providers stream either through an async stream or a pull-based reader.
//! Both shapes are adapted here, once, into a single [`ChunkStream`]. A
//! normalized stream delivers every chunk exactly once, in order, and ends
//! after the first error.

use futures::StreamExt;

use super::types::ChunkStream;
use crate::traits::{ChunkReader, ChunkSource};

/// Adapt a provider chunk source into the uniform pull loop.
pub fn normalize_chunk_source(source: ChunkSource) -> ChunkStream {
    match source {
        ChunkSource::Stream(stream) => fuse_on_error(stream),
        ChunkSource::Reader(reader) => reader_stream(reader),
    }
}

fn fuse_on_error(stream: ChunkStream) -> ChunkStream {
    let mut inner = stream;
    let s = async_stream::stream! {
        while let Some(item) = inner.next().await {
            let failed = item.is_err();
            yield item;
            if failed {
                break;
            }
        }
    };
    Box::pin(s)
}

/// Owns a reader and releases its lock exactly once: on exhaustion, on
/// failure, or when the consuming stream is dropped mid-way.
struct ReaderGuard {
    reader: Box<dyn ChunkReader>,
    released: bool,
}

impl ReaderGuard {
    fn new(reader: Box<dyn ChunkReader>) -> Self {
        Self {
            reader,
            released: false,
        }
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.reader.release_lock();
        }
    }
}

impl Drop for ReaderGuard {
    fn drop(&mut self) {
        self.release();
    }
}

fn reader_stream(reader: Box<dyn ChunkReader>) -> ChunkStream {
    let s = async_stream::stream! {
        let mut guard = ReaderGuard::new(reader);
        loop {
            match guard.reader.read().await {
                Ok(Some(chunk)) => yield Ok(chunk),
                Ok(None) => break,
                Err(e) => {
                    guard.release();
                    yield Err(e);
                    break;
                }
            }
        }
        guard.release();
    };
    Box::pin(s)
}
