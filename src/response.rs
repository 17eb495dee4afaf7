//! Outbound response shape for the transport layer.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// `{success: true, text}` or `{success: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranscriptionResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            success: true,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failed(error: &PipelineError) -> Self {
        Self {
            success: false,
            text: None,
            error: Some(error.detail().to_string()),
        }
    }

    /// Status code and body for a pipeline outcome.
    pub fn from_result(result: &Result<String, PipelineError>) -> (u16, Self) {
        match result {
            Ok(text) => (200, Self::ok(text.as_str())),
            Err(err) => (err.status_code(), Self::failed(err)),
        }
    }
}
