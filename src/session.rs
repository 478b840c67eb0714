//! Session manager
//!
//! Owns the single provider session of a facade. Sessions are cached by
//! their `SessionConfig`: an identical config reuses the live session, a
//! different one destroys it before the replacement is created. Each session
//! generation carries its own abort scope, which is tripped when the
//! generation ends so that in-flight work against a stale session stops.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as TokioMutex;

use crate::error::{AiError, classify_creation_error};
use crate::events::{EventBus, FacadeEvent};
use crate::kinds::OperationKind;
use crate::probe::CapabilityProbe;
use crate::traits::{CapabilityProvider, CreateSessionOptions, DownloadMonitor, ProviderSession};
use crate::types::SessionConfig;
use crate::utils::cancel::AbortHandle;

struct LiveSession {
    config: SessionConfig,
    session: Arc<dyn ProviderSession>,
}

/// A session handed out for one request, together with the abort scope of
/// the generation it belongs to.
#[derive(Clone)]
pub struct SessionLease {
    pub session: Arc<dyn ProviderSession>,
    pub scope: AbortHandle,
}

impl std::fmt::Debug for SessionLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLease")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

pub struct SessionManager<K: OperationKind> {
    provider: Arc<dyn CapabilityProvider>,
    events: EventBus<K::Output>,
    slot: TokioMutex<Option<LiveSession>>,
    scope: Mutex<AbortHandle>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: OperationKind> SessionManager<K> {
    pub fn new(provider: Arc<dyn CapabilityProvider>, events: EventBus<K::Output>) -> Self {
        Self {
            provider,
            events,
            slot: TokioMutex::new(None),
            scope: Mutex::new(AbortHandle::new()),
            _kind: PhantomData,
        }
    }

    fn current_scope(&self) -> AbortHandle {
        self.scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// End the current generation: trip its abort scope and start a fresh one.
    fn rotate_scope(&self) {
        let mut scope = self.scope.lock().unwrap_or_else(PoisonError::into_inner);
        scope.cancel();
        *scope = AbortHandle::new();
    }

    fn release_live(&self, live: LiveSession) {
        self.rotate_scope();
        live.session.destroy();
        tracing::debug!(kind = %K::CAPABILITY, "session destroyed");
        self.events.emit(FacadeEvent::SessionDestroyed {});
    }

    /// Return a session for `config`, creating it if needed.
    pub async fn ensure_session(
        &self,
        config: &SessionConfig,
        probe: &CapabilityProbe,
    ) -> Result<SessionLease, AiError> {
        let mut slot = self.slot.lock().await;

        if let Some(live) = slot.as_ref() {
            if live.config == *config {
                tracing::trace!(kind = %K::CAPABILITY, "reusing live session");
                return Ok(SessionLease {
                    session: live.session.clone(),
                    scope: self.current_scope(),
                });
            }
        }

        if let Some(previous) = slot.take() {
            tracing::debug!(kind = %K::CAPABILITY, "session config changed; invalidating");
            self.release_live(previous);
        }

        let capability = probe.probe(config).await?;
        K::validate(config, &capability.supported_options)?;

        let scope = self.current_scope();
        let events = self.events.clone();
        let options = CreateSessionOptions {
            abort: scope.clone(),
            monitor: DownloadMonitor::new(move |progress| {
                events.emit(FacadeEvent::Progress {
                    loaded: progress.loaded,
                    total: progress.total,
                });
            }),
        };

        tracing::debug!(
            kind = %K::CAPABILITY,
            provider = self.provider.name(),
            needs_download = capability.needs_download(),
            "creating session"
        );
        let created = tokio::select! {
            biased;
            _ = scope.cancelled() => Err(AiError::Aborted),
            res = self.provider.create_session(K::CAPABILITY, config, options) => {
                res.map_err(classify_creation_error)
            }
        };

        let session = match created {
            Ok(session) if scope.is_cancelled() => {
                session.destroy();
                return Err(AiError::Aborted);
            }
            Ok(session) => session,
            Err(err) => {
                if err.is_reportable() {
                    tracing::warn!(kind = %K::CAPABILITY, error = %err, "session creation failed");
                }
                return Err(err);
            }
        };

        *slot = Some(LiveSession {
            config: config.clone(),
            session: session.clone(),
        });
        drop(slot);

        tracing::debug!(kind = %K::CAPABILITY, "session created");
        self.events.emit(FacadeEvent::SessionCreated {
            config: config.clone(),
        });
        Ok(SessionLease { session, scope })
    }

    /// Destroy the live session if its config differs from `config`.
    /// Returns whether a session was destroyed.
    pub async fn invalidate_if_changed(&self, config: &SessionConfig) -> bool {
        let mut slot = self.slot.lock().await;
        match slot.take() {
            Some(live) if live.config != *config => {
                self.release_live(live);
                true
            }
            other => {
                *slot = other;
                false
            }
        }
    }

    /// Abort everything scoped to the current generation and destroy the
    /// live session. Returns whether a session was destroyed.
    pub async fn release(&self) -> bool {
        // Trip the scope before waiting on the slot so a pending creation
        // gives the lock up.
        self.rotate_scope();
        let live = self.slot.lock().await.take();
        match live {
            Some(live) => {
                self.release_live(live);
                true
            }
            None => false,
        }
    }

    pub async fn has_session(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    pub async fn current_config(&self) -> Option<SessionConfig> {
        self.slot.lock().await.as_ref().map(|live| live.config.clone())
    }
}

impl<K: OperationKind> Drop for SessionManager<K> {
    fn drop(&mut self) {
        self.scope
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
        if let Some(live) = self.slot.get_mut().take() {
            live.session.destroy();
        }
    }
}
