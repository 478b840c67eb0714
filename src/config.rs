//! Facade configuration
//!
//! Every field has a default, so a config can be built in code with the
//! `with_*` methods or deserialized from a partial JSON document.

use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::types::SessionConfig;

/// Whether a capability that still needs a model download counts as available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadPolicy {
    #[default]
    Allow,
    Deny,
}

/// Post-processing applied to language detection results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionSettings {
    /// Detections below this confidence are dropped.
    pub confidence_threshold: f64,
    /// Maximum number of detections returned.
    pub max_suggestions: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.0,
            max_suggestions: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacadeConfig {
    /// Session options used when a request does not bring its own.
    pub session: SessionConfig,
    /// Run `initialize()` implicitly when executing on an uninitialized facade.
    pub auto_initialize: bool,
    pub download_policy: DownloadPolicy,
    pub detection: DetectionSettings,
    /// Upper bound on streamed output, in bytes.
    pub max_stream_buffer_bytes: Option<usize>,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            auto_initialize: true,
            download_policy: DownloadPolicy::Allow,
            detection: DetectionSettings::default(),
            max_stream_buffer_bytes: Some(10 * 1024 * 1024), // 10MB default
        }
    }
}

impl FacadeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, AiError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AiError::ConfigError(format!("invalid facade config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AiError> {
        let threshold = self.detection.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(AiError::ConfigError(format!(
                "confidence threshold must be within 0.0..=1.0, got {threshold}"
            )));
        }
        if self.detection.max_suggestions == 0 {
            return Err(AiError::ConfigError(
                "max suggestions must be at least 1".to_string(),
            ));
        }
        if self.max_stream_buffer_bytes == Some(0) {
            return Err(AiError::ConfigError(
                "stream buffer limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    pub fn with_auto_initialize(mut self, enabled: bool) -> Self {
        self.auto_initialize = enabled;
        self
    }

    pub fn with_download_policy(mut self, policy: DownloadPolicy) -> Self {
        self.download_policy = policy;
        self
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.detection.confidence_threshold = threshold;
        self
    }

    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.detection.max_suggestions = max;
        self
    }

    pub fn with_max_stream_buffer_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_stream_buffer_bytes = limit;
        self
    }
}
