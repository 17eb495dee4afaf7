//! Convenience re-exports for common use.

pub use crate::audio::CanonicalWaveform;
pub use crate::backend::{BackendError, RecognitionBackend};
pub use crate::config::{BackendKind, HarkConfig};
pub use crate::error::{ErrorKind, PipelineError, Result};
pub use crate::intake::{IntakeValidator, UploadedAudio};
pub use crate::pipeline::TranscriptionPipeline;
pub use crate::response::TranscriptionResponse;
