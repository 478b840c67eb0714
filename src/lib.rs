//! # ondevice-ai - Facade over On-Device Language Model Capabilities
//!
//! Wraps host-provided, on-device language model capabilities (translation,
//! summarization, language detection, writing and rewriting) behind one
//! lifecycle-managed, event-emitting interface.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Capability Probe**: One cached availability check per facade, with distinct
//!   ready / downloadable / unavailable tiers.
//! - **Session Reuse**: A single live session per facade, reused while the session
//!   config is unchanged and destroyed before a differently configured one is created.
//! - **Blocking and Streaming Execution**: Both paths share one shaping step, so derived
//!   numbers never depend on how the text arrived.
//! - **Typed Events**: Observers subscribe per event kind or to everything.
//! - **Cancellation**: Every request carries an abort handle; aborted requests end silently.
//! - **Provider Injection**: The host engine sits behind [`CapabilityProvider`], so the
//!   core runs against any backend and deterministically under test.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ondevice_ai::prelude::*;
//!
//! async fn run(provider: std::sync::Arc<dyn CapabilityProvider>) -> Result<(), AiError> {
//!     let writer = Writer::with_defaults(provider);
//!     writer.initialize().await?;
//!
//!     let mut stream = writer.write_streaming("A thank-you note", None).await?;
//!     while let Some(part) = stream.next().await {
//!         match part? {
//!             StreamPart::Chunk(text) => print!("{text}"),
//!             StreamPart::Completed(result) => println!("\n{} words", result.word_count),
//!         }
//!     }
//!     writer.destroy().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod facade;
pub mod kinds;
pub mod observability;
pub mod probe;
pub mod session;
pub mod streaming;
pub mod traits;
pub mod types;
pub mod utils;

pub use config::{DetectionSettings, DownloadPolicy, FacadeConfig};
pub use error::{AiError, ErrorCategory, ProviderError};
pub use events::{EventBus, EventKind, FacadeEvent, SubscriptionId};
pub use facade::{
    Facade, FacadeState, LanguageDetector, Rewriter, Summarizer, Translator, Writer,
};
pub use traits::{CapabilityProvider, ProviderSession};

pub mod prelude {
    pub use crate::config::{DetectionSettings, DownloadPolicy, FacadeConfig};
    pub use crate::error::{AiError, ErrorCategory, ProviderError};
    pub use crate::events::{EventBus, EventKind, FacadeEvent, SubscriptionId};
    pub use crate::facade::{
        Facade, FacadeState, LanguageDetector, Rewriter, Summarizer, Translator, Writer,
    };
    pub use crate::kinds::{Detect, OperationKind, Rewrite, StreamingKind, Summarize, Translate, Write};
    pub use crate::streaming::{ChunkStream, ExecutionStream, StreamPart, collect_completed};
    pub use crate::traits::{
        CapabilityProvider, ChunkReader, ChunkSource, CreateSessionOptions, DownloadMonitor,
        DownloadProgress, ExecuteOptions, ProviderSession,
    };
    pub use crate::types::*;
    pub use crate::utils::AbortHandle;
    pub use futures::StreamExt;
}
