//! Intake → normalization → recognition, composed per request.

use std::io::{Read, Seek};
use std::sync::Arc;

use crate::audio::{self, CanonicalWaveform};
use crate::backend::RecognitionBackend;
use crate::error::{PipelineError, Result};
use crate::intake::{IntakeValidator, UploadedAudio, ValidatedAudio};

/// One pipeline instance serves any number of concurrent requests; it holds
/// no per-request state.
#[derive(Clone)]
pub struct TranscriptionPipeline {
    validator: IntakeValidator,
    backend: Arc<dyn RecognitionBackend>,
}

impl std::fmt::Debug for TranscriptionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranscriptionPipeline")
            .field("validator", &self.validator)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl TranscriptionPipeline {
    pub fn new(validator: IntakeValidator, backend: Arc<dyn RecognitionBackend>) -> Self {
        Self { validator, backend }
    }

    pub fn validator(&self) -> &IntakeValidator {
        &self.validator
    }

    /// Run an upload through every stage.
    #[tracing::instrument(skip_all, fields(backend = self.backend.name()))]
    pub async fn transcribe(&self, upload: Option<UploadedAudio>) -> Result<String> {
        let validated = self.validator.validate(upload)?;
        self.run(validated).await
    }

    /// Same as [`transcribe`](Self::transcribe) for a seekable source; the
    /// stream is buffered only after it passes the size check.
    ///
    /// Seeking and reading happen on the blocking pool.
    #[tracing::instrument(skip_all, fields(backend = self.backend.name()))]
    pub async fn transcribe_reader<R>(&self, reader: R, filename: Option<&str>) -> Result<String>
    where
        R: Read + Seek + Send + 'static,
    {
        let validator = self.validator;
        let filename = filename.map(ToString::to_string);
        let validated = tokio::task::spawn_blocking(move || {
            validator.read_upload(reader, filename.as_deref())
        })
        .await
        .map_err(|e| blocking_task_failed("read", e))??;
        self.run(validated).await
    }

    async fn run(&self, validated: ValidatedAudio) -> Result<String> {
        tracing::debug!(
            filename = %validated.filename,
            bytes = validated.bytes.len(),
            "upload accepted"
        );

        let waveform = normalize_blocking(validated).await?;

        let text = self.backend.recognize(&waveform).await.map_err(|e| {
            tracing::warn!(error = %e, "recognition failed");
            PipelineError::from(e)
        })?;

        tracing::info!(
            chars = text.len(),
            duration_secs = waveform.duration().as_secs_f32(),
            "transcription completed"
        );
        Ok(text)
    }
}

/// Decoding is CPU-bound; keep it off the async workers.
async fn normalize_blocking(validated: ValidatedAudio) -> Result<CanonicalWaveform> {
    let ValidatedAudio {
        bytes, extension, ..
    } = validated;

    tokio::task::spawn_blocking(move || audio::normalize(bytes, Some(extension)))
        .await
        .map_err(|e| blocking_task_failed("normalization", e))?
}

fn blocking_task_failed(stage: &str, error: tokio::task::JoinError) -> PipelineError {
    tracing::error!(stage, error = %error, "blocking task failed");
    PipelineError::internal(error)
}
