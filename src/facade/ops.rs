//! Per-kind entry points.

use super::Facade;
use crate::error::AiError;
use crate::kinds::{Detect, Rewrite, Summarize, Translate, Write};
use crate::streaming::ExecutionStream;
use crate::types::{
    ExecutionRequest, LanguageDetection, RewriteResult, SummaryResult, TranslationResult,
    WriteResult,
};

impl Facade<Translate> {
    /// Translate `text` with the default session's language pair.
    pub async fn translate(&self, text: &str) -> Result<TranslationResult, AiError> {
        self.execute(self.request(text)).await
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// Uses a session configured for that pair, so switching pairs replaces
    /// the live session.
    pub async fn translate_with(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<TranslationResult, AiError> {
        let config = self
            .session_config()
            .with_source_language(source)
            .with_target_language(target);
        self.execute(ExecutionRequest::new(text, config)).await
    }
}

impl Facade<Summarize> {
    pub async fn summarize(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<SummaryResult, AiError> {
        self.execute(self.request(text).with_optional_context(context))
            .await
    }

    pub async fn summarize_streaming(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<ExecutionStream<SummaryResult>, AiError> {
        self.execute_streaming(self.request(text).with_optional_context(context))
            .await
    }
}

impl Facade<Detect> {
    /// Detect the language of `text`, ranked by confidence.
    pub async fn detect(&self, text: &str) -> Result<Vec<LanguageDetection>, AiError> {
        self.execute(self.request(text)).await
    }
}

impl Facade<Write> {
    pub async fn write(&self, prompt: &str, context: Option<&str>) -> Result<WriteResult, AiError> {
        self.execute(self.request(prompt).with_optional_context(context))
            .await
    }

    pub async fn write_streaming(
        &self,
        prompt: &str,
        context: Option<&str>,
    ) -> Result<ExecutionStream<WriteResult>, AiError> {
        self.execute_streaming(self.request(prompt).with_optional_context(context))
            .await
    }
}

impl Facade<Rewrite> {
    pub async fn rewrite(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<RewriteResult, AiError> {
        self.execute(self.request(text).with_optional_context(context))
            .await
    }

    pub async fn rewrite_streaming(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> Result<ExecutionStream<RewriteResult>, AiError> {
        self.execute_streaming(self.request(text).with_optional_context(context))
            .await
    }
}
