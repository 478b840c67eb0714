//! Core error types

use thiserror::Error;

/// Errors surfaced by the facade.
///
/// Every failure reported by a capability provider is classified into one of
/// these variants at the facade boundary before it reaches the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AiError {
    /// The capability cannot be used in this environment.
    #[error("Capability unavailable: {reason}")]
    CapabilityUnavailable { reason: String },

    /// The availability check itself failed. Not cached, so retrying probes again.
    #[error("Availability check failed: {0}")]
    ProbeFailed(String),

    /// A model download is needed before a session can run.
    #[error("Model download required before the capability can be used")]
    DownloadRequired,

    /// The provider refused to proceed without a direct user interaction.
    #[error("User gesture required: {0}")]
    UserGestureRequired(String),

    #[error("Session creation failed: {0}")]
    SessionCreationFailed(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Caller-initiated cancellation. Never emitted as an `error` event.
    #[error("Operation aborted")]
    Aborted,

    /// An operation was called in a lifecycle state that does not allow it.
    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification used for retry decisions and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Permanent for this environment.
    Environment,
    /// Not strictly a failure; describes a pending state.
    Informational,
    /// Retriable after a qualifying user interaction.
    Interaction,
    /// Retriable as-is.
    Transient,
    Cancelled,
    /// Misuse of the API by the caller.
    Programmer,
}

impl AiError {
    pub fn capability_unavailable(reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CapabilityUnavailable { .. } => ErrorCategory::Environment,
            Self::DownloadRequired => ErrorCategory::Informational,
            Self::UserGestureRequired(_) => ErrorCategory::Interaction,
            Self::ProbeFailed(_) | Self::SessionCreationFailed(_) | Self::ExecutionFailed(_) => {
                ErrorCategory::Transient
            }
            Self::Aborted => ErrorCategory::Cancelled,
            Self::NotReady(_)
            | Self::InvalidInput(_)
            | Self::InvalidConfig(_)
            | Self::ConfigError(_) => ErrorCategory::Programmer,
        }
    }

    /// Whether a caller-initiated retry can succeed without changing the environment.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Interaction | ErrorCategory::Transient
        )
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted)
    }

    /// Whether this error is reported through the `error` event.
    pub fn is_reportable(&self) -> bool {
        !self.is_aborted()
    }
}

/// Failure reported by a capability provider.
///
/// `name` follows the DOMException convention (`NotAllowedError`,
/// `AbortError`, ...) when the host supplies one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", self.display())]
pub struct ProviderError {
    pub name: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: None,
            message: message.into(),
        }
    }

    pub fn named(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            message: message.into(),
        }
    }

    pub fn aborted() -> Self {
        Self::named("AbortError", "The operation was aborted")
    }

    pub fn is_abort(&self) -> bool {
        self.name.as_deref() == Some("AbortError")
    }

    fn display(&self) -> String {
        match &self.name {
            Some(name) => format!("{name}: {}", self.message),
            None => self.message.clone(),
        }
    }
}
