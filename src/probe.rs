//! Capability probe
//!
//! Queries the provider's availability check once per facade lifetime and
//! caches the answer. A Downloadable tier is a successful probe; only an
//! Unavailable tier fails, and it fails the same way on every later call
//! until the probe is explicitly reset.

use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex as TokioMutex;

use crate::error::{AiError, classify_probe_error};
use crate::traits::CapabilityProvider;
use crate::types::{
    Availability, AvailabilityTier, Capability, CapabilityKind, SessionConfig, SupportedOptions,
};

#[derive(Debug, Clone)]
enum ProbeOutcome {
    Supported(Capability),
    Unsupported { reason: String },
}

#[derive(Default)]
struct ProbeCache {
    /// Bumped by every reset; answers from an older generation are dropped.
    generation: u64,
    outcome: Option<ProbeOutcome>,
}

pub struct CapabilityProbe {
    provider: Arc<dyn CapabilityProvider>,
    kind: CapabilityKind,
    default_options: SupportedOptions,
    cache: RwLock<ProbeCache>,
    /// Serializes provider calls so concurrent probes share one answer.
    probing: TokioMutex<()>,
}

impl CapabilityProbe {
    pub fn new(
        provider: Arc<dyn CapabilityProvider>,
        kind: CapabilityKind,
        default_options: SupportedOptions,
    ) -> Self {
        Self {
            provider,
            kind,
            default_options,
            cache: RwLock::new(ProbeCache::default()),
            probing: TokioMutex::new(()),
        }
    }

    fn cached(&self) -> Option<ProbeOutcome> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .outcome
            .clone()
    }

    fn generation(&self) -> u64 {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Cache `outcome` unless the probe was reset since `generation` was read.
    fn store(&self, generation: u64, outcome: ProbeOutcome) -> bool {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        if cache.generation != generation {
            return false;
        }
        cache.outcome = Some(outcome);
        true
    }

    fn outcome_result(outcome: ProbeOutcome) -> Result<Capability, AiError> {
        match outcome {
            ProbeOutcome::Supported(capability) => Ok(capability),
            ProbeOutcome::Unsupported { reason } => Err(AiError::CapabilityUnavailable { reason }),
        }
    }

    /// Return the cached capability, querying the provider on first use.
    ///
    /// Transport failures are not cached, so a later call retries them.
    pub async fn probe(&self, config: &SessionConfig) -> Result<Capability, AiError> {
        if let Some(outcome) = self.cached() {
            return Self::outcome_result(outcome);
        }

        let _guard = self.probing.lock().await;
        if let Some(outcome) = self.cached() {
            return Self::outcome_result(outcome);
        }

        let generation = self.generation();
        tracing::debug!(kind = %self.kind, provider = self.provider.name(), "probing capability");
        let availability = self
            .provider
            .availability(self.kind, config)
            .await
            .map_err(|e| {
                let err = classify_probe_error(e);
                tracing::warn!(kind = %self.kind, error = %err, "capability probe failed");
                err
            })?;

        let outcome = match availability {
            Availability::Unavailable { reason } => ProbeOutcome::Unsupported { reason },
            other => ProbeOutcome::Supported(Capability {
                kind: self.kind,
                availability_tier: AvailabilityTier::from(&other),
                supported_options: self
                    .provider
                    .supported_options(self.kind)
                    .unwrap_or_else(|| self.default_options.clone()),
                download_in_progress: other == Availability::Downloading,
                probed_at: Utc::now(),
            }),
        };
        tracing::debug!(kind = %self.kind, outcome = ?outcome, "capability probed");
        if !self.store(generation, outcome.clone()) {
            tracing::debug!(kind = %self.kind, "probe was reset while in flight; answer not cached");
        }
        Self::outcome_result(outcome)
    }

    /// Discard the cached answer and query the provider again.
    pub async fn reprobe(&self, config: &SessionConfig) -> Result<Capability, AiError> {
        self.reset();
        self.probe(config).await
    }

    /// Forget the cached answer.
    pub fn reset(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        cache.generation += 1;
        cache.outcome = None;
    }

    pub fn capability(&self) -> Option<Capability> {
        match self.cached()? {
            ProbeOutcome::Supported(capability) => Some(capability),
            ProbeOutcome::Unsupported { .. } => None,
        }
    }

    /// Last observed tier, if the provider has answered.
    pub fn tier(&self) -> Option<AvailabilityTier> {
        self.cached().map(|outcome| match outcome {
            ProbeOutcome::Supported(capability) => capability.availability_tier,
            ProbeOutcome::Unsupported { .. } => AvailabilityTier::Unavailable,
        })
    }
}
