//! OpenAI-compatible Whisper transcription (`/audio/transcriptions`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use uuid::Uuid;

use super::http::{bearer_headers, shared_client, status_to_error, trim_trailing_slash};
use super::openai_helpers::{build_transcription_multipart, whisper_language};
use super::{BackendError, RecognitionBackend};
use crate::audio::CanonicalWaveform;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Whisper client; uploads the canonical waveform as a WAV file.
#[derive(Debug, Clone)]
pub struct OpenAiWhisperBackend {
    api_key: String,
    base_url: String,
    model: String,
    language: Option<String>,
    timeout: Duration,
}

impl OpenAiWhisperBackend {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            model: DEFAULT_WHISPER_MODEL.to_string(),
            language: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), BackendError> {
        if self.api_key.trim().is_empty() {
            return Err(BackendError::Service(
                "missing OpenAI API key".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(BackendError::Service(
                "transcription model cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RecognitionBackend for OpenAiWhisperBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn recognize(&self, waveform: &CanonicalWaveform) -> Result<String, BackendError> {
        self.validate()?;

        let wav = waveform
            .to_wav()
            .map_err(|e| BackendError::Unexpected(format!("failed to encode WAV: {e}")))?;

        let boundary = format!("hark-{}", Uuid::new_v4().simple());
        let language = self.language.as_deref().and_then(whisper_language);
        let body = build_transcription_multipart(&boundary, &self.model, &wav, language);

        let mut headers = bearer_headers(&self.api_key);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&format!("multipart/form-data; boundary={boundary}"))
                .map_err(|e| BackendError::Unexpected(format!("invalid content-type: {e}")))?,
        );

        let url = format!(
            "{}/audio/transcriptions",
            trim_trailing_slash(&self.base_url)
        );

        tracing::debug!(model = %self.model, bytes = wav.len(), "sending audio to Whisper");

        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .headers(headers)
                .body(body)
                .send()
                .await?;

            parse_transcription_response(response).await
        })
        .await
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

async fn parse_transcription_response(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    if status != 200 {
        return Err(status_to_error(status, &body));
    }

    let parsed: TranscriptionResponse = serde_json::from_str(&body)?;
    let text = parsed.text.trim();
    if text.is_empty() {
        return Err(BackendError::Unintelligible);
    }
    Ok(text.to_string())
}
