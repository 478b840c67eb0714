//! Error Handling Module
//!
//! This module provides the error taxonomy of the facade, including:
//! - Core error types (`AiError`, `ErrorCategory`, `ProviderError`)
//! - Classification of raw provider failures into the taxonomy
//! - User-facing error summaries
//!
//! # Example
//!
//! ```rust,ignore
//! use ondevice_ai::error::{AiError, ErrorCategory};
//!
//! let error = AiError::UserGestureRequired("click to download".into());
//! assert_eq!(error.category(), ErrorCategory::Interaction);
//! assert!(error.is_retryable());
//! ```

// Module declarations
pub mod helpers;
pub mod types;

// Re-exports for public API
pub use helpers::*;
pub use types::*;
