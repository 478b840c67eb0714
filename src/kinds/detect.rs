use super::OperationKind;
use crate::config::{DetectionSettings, FacadeConfig};
use crate::error::AiError;
use crate::types::{
    CapabilityKind, ExecutionRequest, LanguageDetection, SessionOutput, SupportedOptions,
};

/// Language detection. Never streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detect;

impl OperationKind for Detect {
    type Output = Vec<LanguageDetection>;

    const CAPABILITY: CapabilityKind = CapabilityKind::LanguageDetector;

    fn default_options() -> SupportedOptions {
        SupportedOptions::new()
    }

    fn shape(
        _request: &ExecutionRequest,
        output: SessionOutput,
        settings: &FacadeConfig,
    ) -> Result<Vec<LanguageDetection>, AiError> {
        match output {
            SessionOutput::Detections(detections) => {
                Ok(rank_detections(detections, &settings.detection))
            }
            SessionOutput::Text(_) => Err(AiError::ExecutionFailed(
                "language detector returned text instead of detections".to_string(),
            )),
        }
    }
}

/// Sort by descending confidence, drop entries below the threshold and keep
/// at most `max_suggestions`.
pub fn rank_detections(
    mut detections: Vec<LanguageDetection>,
    settings: &DetectionSettings,
) -> Vec<LanguageDetection> {
    detections.retain(|d| d.confidence >= settings.confidence_threshold);
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    detections.truncate(settings.max_suggestions);
    detections
}
