//! Error types for the transcription pipeline.

pub mod unified;

pub use unified::ErrorKind;

use thiserror::Error;

/// Message returned when the recognizer hears nothing it can transcribe.
pub const UNINTELLIGIBLE_MESSAGE: &str =
    "Could not understand audio - poor audio quality or empty recording";

/// Every failure a pipeline run can end with.
///
/// Each stage converts its raw failures (decoder errors, HTTP errors, I/O)
/// into exactly one of these variants before returning. The `Display`
/// output is the caller-facing message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    EmptyAudio(String),

    #[error("{0}")]
    RecognitionUnintelligible(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    InternalFailure(String),
}

impl PipelineError {
    /// Upload could not be decoded as audio.
    pub fn invalid_audio(reason: impl std::fmt::Display) -> Self {
        Self::InvalidInput(format!("Invalid audio file: {reason}"))
    }

    /// Upload exceeded the intake size limit.
    pub fn too_large(max_bytes: u64) -> Self {
        let mib = max_bytes / (1024 * 1024);
        let limit = if mib > 0 {
            format!("{mib}MB")
        } else {
            format!("{max_bytes} bytes")
        };
        Self::InvalidInput(format!("File too large (max {limit} allowed)"))
    }

    /// Zero bytes uploaded, or nothing decoded.
    pub fn empty_audio() -> Self {
        Self::EmptyAudio("Empty audio file".to_string())
    }

    pub fn unintelligible() -> Self {
        Self::RecognitionUnintelligible(UNINTELLIGIBLE_MESSAGE.to_string())
    }

    pub fn service(message: impl std::fmt::Display) -> Self {
        Self::ServiceUnavailable(format!("Speech recognition service error: {message}"))
    }

    pub fn internal(message: impl std::fmt::Display) -> Self {
        Self::InternalFailure(format!("Processing error: {message}"))
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::EmptyAudio(_) => ErrorKind::EmptyAudio,
            Self::RecognitionUnintelligible(_) => ErrorKind::RecognitionUnintelligible,
            Self::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            Self::InternalFailure(_) => ErrorKind::InternalFailure,
        }
    }

    /// The human-readable detail carried by the variant.
    pub fn detail(&self) -> &str {
        match self {
            Self::InvalidInput(detail)
            | Self::UnsupportedFormat(detail)
            | Self::EmptyAudio(detail)
            | Self::RecognitionUnintelligible(detail)
            | Self::ServiceUnavailable(detail)
            | Self::InternalFailure(detail) => detail,
        }
    }

    /// HTTP status the boundary layer must answer with.
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Whether the failure was caused by the uploaded payload.
    pub fn is_client_error(&self) -> bool {
        self.kind().is_client_error()
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PipelineError>;
