//! Remote speech-recognition backends.

pub mod http;

#[cfg(feature = "google")]
pub mod google;

#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "openai")]
mod openai_helpers;

#[cfg(feature = "google")]
pub use google::GoogleSpeechBackend;
#[cfg(feature = "openai")]
pub use openai::OpenAiWhisperBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::CanonicalWaveform;
use crate::error::PipelineError;

/// Failure reported by a recognition backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend answered but found no speech it could transcribe.
    #[error("speech could not be understood")]
    Unintelligible,

    /// Network failure, quota, rejected request, non-success status.
    #[error("{0}")]
    Service(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// Anything else, e.g. a response body that does not parse.
    #[error("{0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        Self::Service(error.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(error: serde_json::Error) -> Self {
        Self::Unexpected(format!("malformed backend response: {error}"))
    }
}

impl From<BackendError> for PipelineError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unintelligible => PipelineError::unintelligible(),
            BackendError::Service(_) | BackendError::Timeout(_) => PipelineError::service(error),
            BackendError::Unexpected(message) => PipelineError::internal(message),
        }
    }
}

/// A speech-recognition service that turns a canonical waveform into text.
///
/// Implementations make exactly one request per call and do not retry.
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn recognize(&self, waveform: &CanonicalWaveform) -> Result<String, BackendError>;
}
