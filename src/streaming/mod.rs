//! Streaming Module
//!
//! Streaming functionality shared by every streaming-capable operation kind:
//! - Chunk stream and result stream types
//! - Normalization of provider chunk sources into one pull loop
//! - Accumulation of streamed text with buffer limits

mod normalize;
mod processor;
mod types;

pub use normalize::*;
pub use processor::*;
pub use types::*;
