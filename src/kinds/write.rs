use super::{OperationKind, StreamingKind, expect_text};
use crate::config::FacadeConfig;
use crate::error::AiError;
use crate::types::{
    CapabilityKind, ExecutionRequest, Format, Length, SessionOutput, SupportedOptions, Tone,
    WriteResult,
};
use crate::utils::text::{text_length, word_count};

/// Free-form writing from a prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Write;

impl OperationKind for Write {
    type Output = WriteResult;

    const CAPABILITY: CapabilityKind = CapabilityKind::Writer;

    fn default_options() -> SupportedOptions {
        SupportedOptions::new()
            .with_tones([Tone::Formal, Tone::Neutral, Tone::Casual])
            .with_formats([Format::Markdown, Format::PlainText])
            .with_lengths([Length::Short, Length::Medium, Length::Long])
    }

    fn shape(
        _request: &ExecutionRequest,
        output: SessionOutput,
        _settings: &FacadeConfig,
    ) -> Result<WriteResult, AiError> {
        let content = expect_text(Self::CAPABILITY, output)?;
        Ok(WriteResult {
            word_count: word_count(&content),
            character_count: text_length(&content),
            content,
        })
    }
}

impl StreamingKind for Write {}
