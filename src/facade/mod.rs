//! Facade
//!
//! `Facade<K>` composes the capability probe, the session manager, the
//! request executor and the event bus for one operation kind. The same
//! generic type backs every kind; per-kind entry points such as
//! [`Summarizer::summarize`](Facade::summarize) live in `ops`.
//!
//! ```rust,ignore
//! use ondevice_ai::prelude::*;
//!
//! let summarizer = Summarizer::with_defaults(provider);
//! summarizer.events().on(EventKind::StreamingChunk, |e| println!("{e:?}"));
//! summarizer.initialize().await?;
//! let result = summarizer.summarize(article, None).await?;
//! println!("{}% shorter", result.compression_ratio);
//! summarizer.destroy().await;
//! ```

mod ops;
mod state;

pub use state::FacadeState;

use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as TokioMutex;
use tracing::Instrument;

use crate::config::{DownloadPolicy, FacadeConfig};
use crate::error::AiError;
use crate::events::{EventBus, FacadeEvent};
use crate::executor::{RequestExecutor, report_error};
use crate::kinds::{Detect, OperationKind, Rewrite, StreamingKind, Summarize, Translate, Write};
use crate::probe::CapabilityProbe;
use crate::session::{SessionLease, SessionManager};
use crate::streaming::ExecutionStream;
use crate::traits::CapabilityProvider;
use crate::types::{
    AvailabilityTier, Capability, ExecutionRequest, Format, Length, SessionConfig, SummaryType,
    Tone,
};
use state::StateCell;

pub type Translator = Facade<Translate>;
pub type Summarizer = Facade<Summarize>;
pub type LanguageDetector = Facade<Detect>;
pub type Writer = Facade<Write>;
pub type Rewriter = Facade<Rewrite>;

pub struct Facade<K: OperationKind> {
    config: FacadeConfig,
    default_session: Mutex<SessionConfig>,
    events: EventBus<K::Output>,
    probe: CapabilityProbe,
    sessions: SessionManager<K>,
    executor: RequestExecutor<K>,
    state: StateCell,
    initializing: TokioMutex<()>,
}

static_assertions::assert_impl_all!(Translator: Send, Sync);
static_assertions::assert_impl_all!(Summarizer: Send, Sync);
static_assertions::assert_impl_all!(LanguageDetector: Send, Sync);
static_assertions::assert_impl_all!(Writer: Send, Sync);
static_assertions::assert_impl_all!(Rewriter: Send, Sync);

impl<K: OperationKind> Facade<K> {
    /// Create a facade over `provider`. Fails if `config` does not validate.
    pub fn new(provider: Arc<dyn CapabilityProvider>, config: FacadeConfig) -> Result<Self, AiError> {
        config.validate()?;
        Ok(Self::build(provider, config))
    }

    /// Create a facade with the default configuration.
    pub fn with_defaults(provider: Arc<dyn CapabilityProvider>) -> Self {
        Self::build(provider, FacadeConfig::default())
    }

    fn build(provider: Arc<dyn CapabilityProvider>, config: FacadeConfig) -> Self {
        let events = EventBus::new();
        Self {
            default_session: Mutex::new(config.session.clone()),
            probe: CapabilityProbe::new(provider.clone(), K::CAPABILITY, K::default_options()),
            sessions: SessionManager::new(provider, events.clone()),
            executor: RequestExecutor::new(events.clone()),
            events,
            config,
            state: StateCell::new(),
            initializing: TokioMutex::new(()),
        }
    }

    pub fn events(&self) -> &EventBus<K::Output> {
        &self.events
    }

    pub fn state(&self) -> FacadeState {
        self.state.get()
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Session options used by the convenience operations.
    pub fn session_config(&self) -> SessionConfig {
        self.default_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Build a request for `text` against the default session options.
    pub fn request(&self, text: impl Into<String>) -> ExecutionRequest {
        ExecutionRequest::new(text, self.session_config())
    }

    fn span(&self) -> tracing::Span {
        tracing::info_span!("facade", kind = %K::CAPABILITY)
    }

    /// Probe the capability and move to Ready.
    ///
    /// Idempotent once Ready. On failure the facade returns to Uninitialized
    /// so the call can be retried.
    pub async fn initialize(&self) -> Result<Capability, AiError> {
        self.initialize_inner().instrument(self.span()).await
    }

    async fn initialize_inner(&self) -> Result<Capability, AiError> {
        let _serial = self.initializing.lock().await;
        match self.state.get() {
            FacadeState::Ready | FacadeState::Busy => {
                if let Some(capability) = self.probe.capability() {
                    return Ok(capability);
                }
            }
            FacadeState::Destroyed => return Err(FacadeState::Destroyed.not_ready()),
            FacadeState::Uninitialized | FacadeState::Initializing => {}
        }

        if let Err(observed) = self
            .state
            .transition(FacadeState::Uninitialized, FacadeState::Initializing)
        {
            return Err(observed.not_ready());
        }

        match self.probe.probe(&self.session_config()).await {
            Ok(capability) => {
                if let Err(observed) = self
                    .state
                    .transition(FacadeState::Initializing, FacadeState::Ready)
                {
                    return Err(observed.not_ready());
                }
                tracing::info!(tier = ?capability.availability_tier, "initialized");
                self.events.emit(FacadeEvent::Initialized {
                    capabilities: capability.clone(),
                });
                Ok(capability)
            }
            Err(err) => {
                let _ = self
                    .state
                    .transition(FacadeState::Initializing, FacadeState::Uninitialized);
                report_error::<K>(&self.events, &err);
                Err(err)
            }
        }
    }

    /// Discard the cached capability and probe the provider again.
    pub async fn reprobe(&self) -> Result<Capability, AiError> {
        if self.state.get() == FacadeState::Destroyed {
            return Err(FacadeState::Destroyed.not_ready());
        }
        self.probe.reprobe(&self.session_config()).await
    }

    /// Whether the capability can be used, counting a pending download as
    /// available when the download policy allows it.
    pub fn is_available(&self) -> bool {
        match self.probe.tier() {
            Some(AvailabilityTier::Ready) => true,
            Some(AvailabilityTier::Downloadable) => {
                self.config.download_policy == DownloadPolicy::Allow
            }
            Some(AvailabilityTier::Unavailable) | None => false,
        }
    }

    /// Whether a model download is needed before a session can run.
    pub fn needs_download(&self) -> bool {
        self.probe.tier() == Some(AvailabilityTier::Downloadable)
    }

    pub fn capabilities(&self) -> Option<Capability> {
        self.probe.capability()
    }

    pub fn supported_tones(&self) -> Vec<Tone> {
        self.capabilities()
            .map(|c| c.supported_options.tones.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn supported_formats(&self) -> Vec<Format> {
        self.capabilities()
            .map(|c| c.supported_options.formats.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn supported_lengths(&self) -> Vec<Length> {
        self.capabilities()
            .map(|c| c.supported_options.lengths.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn supported_summary_types(&self) -> Vec<SummaryType> {
        self.capabilities()
            .map(|c| c.supported_options.summary_types.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn supported_languages(&self) -> Vec<String> {
        self.capabilities()
            .map(|c| c.supported_options.languages.into_iter().collect())
            .unwrap_or_default()
    }

    /// Make sure the facade is Ready, initializing implicitly when allowed.
    async fn ensure_ready(&self) -> Result<(), AiError> {
        match self.state.get() {
            FacadeState::Ready => Ok(()),
            FacadeState::Uninitialized | FacadeState::Initializing
                if self.config.auto_initialize =>
            {
                self.initialize().await.map(|_| ())
            }
            other => Err(other.not_ready()),
        }
    }

    /// Create (or reuse) the session for the default options.
    pub async fn create_session(&self) -> Result<(), AiError> {
        self.create_session_with(&self.session_config()).await
    }

    /// Create (or reuse) the session for `config`.
    pub async fn create_session_with(&self, config: &SessionConfig) -> Result<(), AiError> {
        self.ensure_ready().await?;
        let created = match self.check_download_policy() {
            Ok(()) => self
                .sessions
                .ensure_session(config, &self.probe)
                .instrument(self.span())
                .await
                .map(|_| ()),
            Err(err) => Err(err),
        };
        created.inspect_err(|err| report_error::<K>(&self.events, err))
    }

    /// Replace the default session options. A live session created with
    /// different options is destroyed before this returns.
    pub async fn set_session_config(&self, config: SessionConfig) {
        *self
            .default_session
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = config.clone();
        self.sessions.invalidate_if_changed(&config).await;
    }

    fn validate_request(request: &ExecutionRequest) -> Result<(), AiError> {
        if request.primary_text.trim().is_empty() {
            return Err(AiError::InvalidInput("input text is empty".to_string()));
        }
        Ok(())
    }

    /// Under `DownloadPolicy::Deny`, refuse to create sessions that would
    /// start a model download.
    fn check_download_policy(&self) -> Result<(), AiError> {
        if self.config.download_policy == DownloadPolicy::Deny && self.needs_download() {
            return Err(AiError::DownloadRequired);
        }
        Ok(())
    }

    /// Lease a session for `request`, giving up if the request is aborted
    /// while the session is still being created.
    async fn lease_for(&self, request: &ExecutionRequest) -> Result<SessionLease, AiError> {
        let leased = match self.check_download_policy() {
            Ok(()) => tokio::select! {
                biased;
                _ = request.abort.cancelled() => Err(AiError::Aborted),
                res = self.sessions.ensure_session(&request.config, &self.probe) => res,
            },
            Err(err) => Err(err),
        };
        leased.inspect_err(|err| report_error::<K>(&self.events, err))
    }

    /// Run `request` to completion.
    pub async fn execute(&self, request: ExecutionRequest) -> Result<K::Output, AiError> {
        Self::validate_request(&request)?;
        self.ensure_ready().await?;
        let _busy = self.state.begin_request(request.abort.clone())?;

        async {
            let lease = self.lease_for(&request).await?;
            self.executor.execute(&lease, &request, &self.config).await
        }
        .instrument(self.span())
        .await
    }

    /// Abort the in-flight request. Returns whether there was one.
    pub fn cancel(&self) -> bool {
        let cancelled = self.state.cancel_in_flight();
        if cancelled {
            tracing::debug!(kind = %K::CAPABILITY, "cancel requested");
        }
        cancelled
    }

    /// Tear everything down. Valid from any state and idempotent.
    pub async fn destroy(&self) {
        if !self.state.mark_destroyed() {
            return;
        }
        let released = self.sessions.release().await;
        self.probe.reset();
        tracing::info!(kind = %K::CAPABILITY, released, "destroyed");
    }
}

impl<K: StreamingKind> Facade<K> {
    /// Run `request` as a stream of chunks ending with the shaped result.
    ///
    /// The facade stays Busy until the returned stream finishes or is dropped.
    pub async fn execute_streaming(
        &self,
        request: ExecutionRequest,
    ) -> Result<ExecutionStream<K::Output>, AiError> {
        Self::validate_request(&request)?;
        self.ensure_ready().await?;
        let busy = self.state.begin_request(request.abort.clone())?;

        async {
            let lease = self.lease_for(&request).await?;
            self.executor
                .execute_streaming(lease, request, self.config.clone(), busy)
                .await
        }
        .instrument(self.span())
        .await
    }
}
