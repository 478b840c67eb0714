//! Capability availability and supported options

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::config::{Format, Length, SummaryType, Tone};

/// The host capability a facade drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    Translator,
    Summarizer,
    LanguageDetector,
    Writer,
    Rewriter,
}

impl CapabilityKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Translator => "translator",
            Self::Summarizer => "summarizer",
            Self::LanguageDetector => "language-detector",
            Self::Writer => "writer",
            Self::Rewriter => "rewriter",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability as reported by a capability provider.
///
/// Reporting `Unavailable` is the normal way to say "unsupported"; providers
/// return an error only for transport-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Availability {
    Available,
    Downloadable,
    Downloading,
    Unavailable { reason: String },
}

/// Three-tier availability model exposed by the facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityTier {
    Ready,
    Downloadable,
    Unavailable,
}

impl From<&Availability> for AvailabilityTier {
    fn from(value: &Availability) -> Self {
        match value {
            Availability::Available => Self::Ready,
            Availability::Downloadable | Availability::Downloading => Self::Downloadable,
            Availability::Unavailable { .. } => Self::Unavailable,
        }
    }
}

/// Enumerated option values a capability accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedOptions {
    #[serde(default)]
    pub tones: BTreeSet<Tone>,
    #[serde(default)]
    pub formats: BTreeSet<Format>,
    #[serde(default)]
    pub lengths: BTreeSet<Length>,
    #[serde(default)]
    pub summary_types: BTreeSet<SummaryType>,
    /// BCP 47 language tags. Empty means "not restricted".
    #[serde(default)]
    pub languages: BTreeSet<String>,
}

impl SupportedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tones(mut self, tones: impl IntoIterator<Item = Tone>) -> Self {
        self.tones.extend(tones);
        self
    }

    pub fn with_formats(mut self, formats: impl IntoIterator<Item = Format>) -> Self {
        self.formats.extend(formats);
        self
    }

    pub fn with_lengths(mut self, lengths: impl IntoIterator<Item = Length>) -> Self {
        self.lengths.extend(lengths);
        self
    }

    pub fn with_summary_types(mut self, types: impl IntoIterator<Item = SummaryType>) -> Self {
        self.summary_types.extend(types);
        self
    }

    pub fn with_languages<S: Into<String>>(mut self, langs: impl IntoIterator<Item = S>) -> Self {
        self.languages.extend(langs.into_iter().map(Into::into));
        self
    }

    pub fn supports_language(&self, tag: &str) -> bool {
        self.languages.is_empty() || self.languages.contains(tag)
    }
}

/// Result of a successful probe. Immutable until the facade is destroyed or
/// explicitly re-probed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub kind: CapabilityKind,
    pub availability_tier: AvailabilityTier,
    pub supported_options: SupportedOptions,
    /// The provider reported a download already running.
    pub download_in_progress: bool,
    pub probed_at: DateTime<Utc>,
}

impl Capability {
    pub fn is_ready(&self) -> bool {
        self.availability_tier == AvailabilityTier::Ready
    }

    pub fn needs_download(&self) -> bool {
        self.availability_tier == AvailabilityTier::Downloadable
    }
}
