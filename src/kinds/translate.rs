use super::{OperationKind, expect_text, validate_options};
use crate::config::FacadeConfig;
use crate::error::AiError;
use crate::types::{
    CapabilityKind, ExecutionRequest, SessionConfig, SessionOutput, SupportedOptions,
    TranslationResult,
};

/// Translation between a source and a target language. Blocking only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translate;

impl OperationKind for Translate {
    type Output = TranslationResult;

    const CAPABILITY: CapabilityKind = CapabilityKind::Translator;

    fn default_options() -> SupportedOptions {
        SupportedOptions::new()
    }

    fn validate(config: &SessionConfig, supported: &SupportedOptions) -> Result<(), AiError> {
        validate_options(config, supported)?;
        for (name, lang) in [
            ("source", &config.source_language),
            ("target", &config.target_language),
        ] {
            match lang.as_deref() {
                None | Some("") => {
                    return Err(AiError::InvalidConfig(format!(
                        "translation requires a {name} language"
                    )));
                }
                Some(tag) if !supported.supports_language(tag) => {
                    return Err(AiError::InvalidConfig(format!(
                        "unsupported {name} language: {tag}"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    fn shape(
        request: &ExecutionRequest,
        output: SessionOutput,
        _settings: &FacadeConfig,
    ) -> Result<TranslationResult, AiError> {
        Ok(TranslationResult {
            translated_text: expect_text(Self::CAPABILITY, output)?,
            source_language: request.config.source_language.clone().unwrap_or_default(),
            target_language: request.config.target_language.clone().unwrap_or_default(),
        })
    }
}
