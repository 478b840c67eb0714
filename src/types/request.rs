//! Per-call execution request

use serde::Serialize;
use uuid::Uuid;

use super::config::SessionConfig;
use crate::utils::cancel::AbortHandle;

/// A single request against a facade. Transient: built per call, never retained.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    pub id: Uuid,
    pub primary_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_context: Option<String>,
    pub config: SessionConfig,
    /// Caller-side abort token. `Facade::cancel` trips the same token.
    #[serde(skip)]
    pub abort: AbortHandle,
}

impl ExecutionRequest {
    pub fn new(primary_text: impl Into<String>, config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            primary_text: primary_text.into(),
            auxiliary_context: None,
            config,
            abort: AbortHandle::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.auxiliary_context = Some(context.into());
        self
    }

    pub fn with_optional_context(mut self, context: Option<&str>) -> Self {
        self.auxiliary_context = context.map(str::to_string);
        self
    }

    pub fn with_abort(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }
}
