//! Operation kinds
//!
//! Each operation kind is a small strategy plugged into the generic session
//! and execution core: it names the capability, declares the supported
//! option schema, validates session configs and shapes raw output into a
//! result record. Kinds that can stream implement [`StreamingKind`].

use serde::Serialize;
use std::fmt;

use crate::config::FacadeConfig;
use crate::error::AiError;
use crate::types::{CapabilityKind, ExecutionRequest, SessionConfig, SessionOutput, SupportedOptions};

mod detect;
mod rewrite;
mod summarize;
mod translate;
mod write;

pub use detect::Detect;
pub use rewrite::Rewrite;
pub use summarize::Summarize;
pub use translate::Translate;
pub use write::Write;

/// Strategy describing one operation kind.
pub trait OperationKind: Send + Sync + 'static {
    /// Shaped result delivered to callers and in `completed` events.
    type Output: Clone + fmt::Debug + Serialize + Send + Sync + 'static;

    const CAPABILITY: CapabilityKind;

    /// Option values accepted when the provider does not report its own.
    fn default_options() -> SupportedOptions;

    /// Reject configs this kind cannot run with.
    fn validate(config: &SessionConfig, supported: &SupportedOptions) -> Result<(), AiError> {
        validate_options(config, supported)
    }

    /// Shape raw provider output. Used by both the blocking and the streaming
    /// path, so derived numbers never depend on how the text arrived.
    fn shape(
        request: &ExecutionRequest,
        output: SessionOutput,
        settings: &FacadeConfig,
    ) -> Result<Self::Output, AiError>;
}

/// Marker for kinds whose sessions can stream chunks.
pub trait StreamingKind: OperationKind {}

/// Check enumerated option values against the supported schema. An empty
/// set in the schema leaves that option unrestricted.
pub(crate) fn validate_options(
    config: &SessionConfig,
    supported: &SupportedOptions,
) -> Result<(), AiError> {
    fn check<T: Ord + fmt::Debug>(
        name: &str,
        value: Option<&T>,
        allowed: &std::collections::BTreeSet<T>,
    ) -> Result<(), AiError> {
        match value {
            Some(v) if !allowed.is_empty() && !allowed.contains(v) => Err(AiError::InvalidConfig(
                format!("unsupported {name}: {v:?}"),
            )),
            _ => Ok(()),
        }
    }

    check("tone", config.tone.as_ref(), &supported.tones)?;
    check("format", config.format.as_ref(), &supported.formats)?;
    check("length", config.length.as_ref(), &supported.lengths)?;
    check(
        "summary type",
        config.summary_type.as_ref(),
        &supported.summary_types,
    )?;
    for lang in config
        .expected_input_languages
        .iter()
        .chain(&config.expected_context_languages)
        .chain(config.output_language.iter())
    {
        if !supported.supports_language(lang) {
            return Err(AiError::InvalidConfig(format!("unsupported language: {lang}")));
        }
    }
    Ok(())
}

/// Extract text output or fail with a descriptive execution error.
pub(crate) fn expect_text(kind: CapabilityKind, output: SessionOutput) -> Result<String, AiError> {
    output.into_text().ok_or_else(|| {
        AiError::ExecutionFailed(format!("{kind} session returned non-text output"))
    })
}
