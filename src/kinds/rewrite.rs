use super::{OperationKind, StreamingKind, expect_text};
use crate::config::FacadeConfig;
use crate::error::AiError;
use crate::types::{
    CapabilityKind, ExecutionRequest, Format, Length, RewriteResult, SessionOutput,
    SupportedOptions, Tone,
};
use crate::utils::text::{change_ratio, text_length};

/// Rewriting of existing text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rewrite;

impl OperationKind for Rewrite {
    type Output = RewriteResult;

    const CAPABILITY: CapabilityKind = CapabilityKind::Rewriter;

    fn default_options() -> SupportedOptions {
        SupportedOptions::new()
            .with_tones([Tone::AsIs, Tone::MoreFormal, Tone::MoreCasual])
            .with_formats([Format::AsIs, Format::Markdown, Format::PlainText])
            .with_lengths([Length::AsIs, Length::Shorter, Length::Longer])
    }

    fn shape(
        request: &ExecutionRequest,
        output: SessionOutput,
        _settings: &FacadeConfig,
    ) -> Result<RewriteResult, AiError> {
        let content = expect_text(Self::CAPABILITY, output)?;
        let original_length = text_length(&request.primary_text);
        let rewritten_length = text_length(&content);
        Ok(RewriteResult {
            change_ratio: change_ratio(original_length, rewritten_length),
            content,
            original_length,
            rewritten_length,
        })
    }
}

impl StreamingKind for Rewrite {}
