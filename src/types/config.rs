//! Session configuration
//!
//! A `SessionConfig` is the immutable option set a provider session is created
//! with. Two requests whose configs differ structurally never share a session.

use serde::{Deserialize, Serialize};

/// Output tone. The first three apply to writing, the `As*`/`More*` values to rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    Formal,
    Neutral,
    Casual,
    AsIs,
    MoreFormal,
    MoreCasual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    AsIs,
    PlainText,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Length {
    Short,
    Medium,
    Long,
    AsIs,
    Shorter,
    Longer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryType {
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

/// Options parameterizing a provider session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Length>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub summary_type: Option<SummaryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_context: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_input_languages: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_context_languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a translation pair.
    pub fn translation(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::default()
            .with_source_language(source)
            .with_target_language(target)
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_summary_type(mut self, summary_type: SummaryType) -> Self {
        self.summary_type = Some(summary_type);
        self
    }

    pub fn with_shared_context(mut self, context: impl Into<String>) -> Self {
        self.shared_context = Some(context.into());
        self
    }

    pub fn with_expected_input_languages<S: Into<String>>(
        mut self,
        langs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.expected_input_languages = langs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_expected_context_languages<S: Into<String>>(
        mut self,
        langs: impl IntoIterator<Item = S>,
    ) -> Self {
        self.expected_context_languages = langs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_language(mut self, lang: impl Into<String>) -> Self {
        self.output_language = Some(lang.into());
        self
    }

    pub fn with_source_language(mut self, lang: impl Into<String>) -> Self {
        self.source_language = Some(lang.into());
        self
    }

    pub fn with_target_language(mut self, lang: impl Into<String>) -> Self {
        self.target_language = Some(lang.into());
        self
    }
}
