use super::{OperationKind, StreamingKind, expect_text};
use crate::config::FacadeConfig;
use crate::error::AiError;
use crate::types::{
    CapabilityKind, ExecutionRequest, Format, Length, SessionOutput, SummaryResult, SummaryType,
    SupportedOptions,
};
use crate::utils::text::{compression_ratio, text_length};

/// Summarization.
#[derive(Debug, Clone, Copy, Default)]
pub struct Summarize;

impl OperationKind for Summarize {
    type Output = SummaryResult;

    const CAPABILITY: CapabilityKind = CapabilityKind::Summarizer;

    fn default_options() -> SupportedOptions {
        SupportedOptions::new()
            .with_summary_types([
                SummaryType::KeyPoints,
                SummaryType::Tldr,
                SummaryType::Teaser,
                SummaryType::Headline,
            ])
            .with_formats([Format::Markdown, Format::PlainText])
            .with_lengths([Length::Short, Length::Medium, Length::Long])
    }

    fn shape(
        request: &ExecutionRequest,
        output: SessionOutput,
        _settings: &FacadeConfig,
    ) -> Result<SummaryResult, AiError> {
        let summary = expect_text(Self::CAPABILITY, output)?;
        let original_length = text_length(&request.primary_text);
        let summary_length = text_length(&summary);
        Ok(SummaryResult {
            compression_ratio: compression_ratio(original_length, summary_length),
            summary,
            original_length,
            summary_length,
        })
    }
}

impl StreamingKind for Summarize {}
