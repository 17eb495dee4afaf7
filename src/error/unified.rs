//! Machine-readable error classification.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind tag for a [`PipelineError`](super::PipelineError).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    UnsupportedFormat,
    EmptyAudio,
    RecognitionUnintelligible,
    ServiceUnavailable,
    InternalFailure,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::InvalidInput,
        ErrorKind::UnsupportedFormat,
        ErrorKind::EmptyAudio,
        ErrorKind::RecognitionUnintelligible,
        ErrorKind::ServiceUnavailable,
        ErrorKind::InternalFailure,
    ];

    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidInput
            | ErrorKind::UnsupportedFormat
            | ErrorKind::EmptyAudio
            | ErrorKind::RecognitionUnintelligible => 400,
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::InternalFailure => 500,
        }
    }

    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
