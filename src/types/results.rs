//! Shaped execution results, one per operation kind.

use serde::{Deserialize, Serialize};

/// Raw output of a blocking provider call.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutput {
    Text(String),
    Detections(Vec<LanguageDetection>),
}

impl SessionOutput {
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Detections(_) => None,
        }
    }
}

impl From<String> for SessionOutput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SessionOutput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_language: String,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    pub original_length: usize,
    pub summary_length: usize,
    /// Percentage of the input removed; negative when the summary is longer.
    pub compression_ratio: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    pub content: String,
    pub word_count: usize,
    pub character_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    pub content: String,
    pub original_length: usize,
    pub rewritten_length: usize,
    pub change_ratio: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetection {
    pub detected_language: String,
    pub confidence: f64,
}

impl LanguageDetection {
    pub fn new(language: impl Into<String>, confidence: f64) -> Self {
        Self {
            detected_language: language.into(),
            confidence,
        }
    }
}
