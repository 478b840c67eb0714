//! Error classification and user-facing helpers.
//!
//! Raw provider failures are mapped into the `AiError` taxonomy here, and
//! classified errors can be turned into structured summaries suitable for
//! UI rendering.

use super::types::{AiError, ErrorCategory, ProviderError};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INTERACTION_REQUIRED: Regex = Regex::new(
        r"(?i)(user\s+gesture|user\s+activation|direct\s+(user\s+)?interaction|requires?\s+(an?\s+)?interaction|notallowederror)"
    )
    .expect("interaction pattern is valid");
}

/// Whether a provider failure signals that a direct user interaction is needed.
pub fn requires_user_interaction(err: &ProviderError) -> bool {
    err.name.as_deref() == Some("NotAllowedError") || INTERACTION_REQUIRED.is_match(&err.message)
}

/// Classify a failure raised while querying availability.
///
/// A thrown availability check says nothing about support; only an
/// Unavailable answer does.
pub fn classify_probe_error(err: ProviderError) -> AiError {
    AiError::ProbeFailed(err.to_string())
}

/// Classify a failure raised while creating a session.
pub fn classify_creation_error(err: ProviderError) -> AiError {
    if err.is_abort() {
        AiError::Aborted
    } else if requires_user_interaction(&err) {
        AiError::UserGestureRequired(err.message)
    } else {
        AiError::SessionCreationFailed(err.to_string())
    }
}

/// Classify a failure raised by a running (blocking or streaming) request.
pub fn classify_execution_error(err: ProviderError) -> AiError {
    if err.is_abort() {
        AiError::Aborted
    } else {
        AiError::ExecutionFailed(err.to_string())
    }
}

/// Error kind for presentation (coarse-grained)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unsupported,
    Probe,
    Download,
    Gesture,
    Session,
    Execution,
    Cancelled,
    Usage,
}

/// Structured error summary for UI consumption
#[derive(Debug, Clone)]
pub struct ErrorSummary {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
    pub suggestions: Vec<String>,
}

/// Summarize an AiError with friendly suggestions.
pub fn summarize_error(err: &AiError) -> ErrorSummary {
    ErrorSummary {
        kind: map_error_kind(err),
        message: err.to_string(),
        retryable: err.is_retryable(),
        suggestions: suggest_fixes(err),
    }
}

/// Map AiError to presentation ErrorKind.
pub fn map_error_kind(err: &AiError) -> ErrorKind {
    match err {
        AiError::CapabilityUnavailable { .. } => ErrorKind::Unsupported,
        AiError::ProbeFailed(_) => ErrorKind::Probe,
        AiError::DownloadRequired => ErrorKind::Download,
        AiError::UserGestureRequired(_) => ErrorKind::Gesture,
        AiError::SessionCreationFailed(_) => ErrorKind::Session,
        AiError::ExecutionFailed(_) => ErrorKind::Execution,
        AiError::Aborted => ErrorKind::Cancelled,
        AiError::NotReady(_)
        | AiError::InvalidInput(_)
        | AiError::InvalidConfig(_)
        | AiError::ConfigError(_) => ErrorKind::Usage,
    }
}

/// Suggest fixes based on error type.
pub fn suggest_fixes(err: &AiError) -> Vec<String> {
    let mut tips = Vec::new();
    match err.category() {
        ErrorCategory::Environment => {
            tips.push("This capability is not supported on this device or browser".to_string());
        }
        ErrorCategory::Informational => {
            tips.push("Start the model download from a user action, then retry".to_string());
        }
        ErrorCategory::Interaction => {
            tips.push("Retry from a direct user interaction such as a button click".to_string());
        }
        ErrorCategory::Transient => {
            tips.push("Retry the request".to_string());
        }
        ErrorCategory::Programmer => {
            tips.push("Check the call order and request parameters".to_string());
        }
        ErrorCategory::Cancelled => {}
    }
    tips
}

/// Render a CLI-friendly string for ErrorSummary.
pub fn format_summary(summary: &ErrorSummary) -> String {
    let mut out = format!("Message: {}\n", summary.message);
    if !summary.suggestions.is_empty() {
        out.push_str("Suggestions:\n");
        for s in &summary.suggestions {
            out.push_str(&format!("  - {s}\n"));
        }
    }
    out
}
