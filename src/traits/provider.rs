//! Provider-level capability trait

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::session::ProviderSession;
use crate::error::ProviderError;
use crate::types::{Availability, CapabilityKind, SessionConfig, SupportedOptions};
use crate::utils::cancel::AbortHandle;

/// Download progress reported while a model is fetched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadProgress {
    pub loaded: f64,
    pub total: f64,
}

impl DownloadProgress {
    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.total <= 0.0 {
            0.0
        } else {
            (self.loaded / self.total).clamp(0.0, 1.0)
        }
    }
}

type ProgressCallback = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

/// Sink a provider reports download progress into during session creation.
#[derive(Clone)]
pub struct DownloadMonitor {
    callback: Option<ProgressCallback>,
}

impl DownloadMonitor {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(DownloadProgress) + Send + Sync + 'static,
    {
        Self {
            callback: Some(Arc::new(callback)),
        }
    }

    /// A monitor that discards every report.
    pub fn noop() -> Self {
        Self { callback: None }
    }

    pub fn report(&self, loaded: f64, total: f64) {
        if let Some(callback) = &self.callback {
            callback(DownloadProgress { loaded, total });
        }
    }
}

impl fmt::Debug for DownloadMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadMonitor")
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Options forwarded to [`CapabilityProvider::create_session`].
#[derive(Debug, Clone)]
pub struct CreateSessionOptions {
    /// Abort scope of the session generation being created.
    pub abort: AbortHandle,
    pub monitor: DownloadMonitor,
}

/// A host AI engine exposing one or more capabilities.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Provider name used in logs.
    fn name(&self) -> &str {
        "provider"
    }

    /// Report availability for `kind` with the requested option shape.
    ///
    /// Must return `Availability::Unavailable` for unsupported capabilities;
    /// errors are reserved for transport-level failures.
    async fn availability(
        &self,
        kind: CapabilityKind,
        config: &SessionConfig,
    ) -> Result<Availability, ProviderError>;

    /// Option values the provider supports for `kind`. `None` falls back to
    /// the operation kind's built-in schema.
    fn supported_options(&self, _kind: CapabilityKind) -> Option<SupportedOptions> {
        None
    }

    /// Create a session. May suspend on a gesture-gated model download and
    /// may fail with an interaction-required error.
    async fn create_session(
        &self,
        kind: CapabilityKind,
        config: &SessionConfig,
        options: CreateSessionOptions,
    ) -> Result<Arc<dyn ProviderSession>, ProviderError>;
}
