//! Google Cloud Speech-to-Text (`speech:recognize`, synchronous).

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use super::http::{shared_client, status_to_error, trim_trailing_slash};
use super::{BackendError, RecognitionBackend};
use crate::audio::CanonicalWaveform;
use crate::util::timeout::with_timeout;

pub const DEFAULT_BASE_URL: &str = "https://speech.googleapis.com/v1";
pub const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Google Speech-to-Text v1 client sending LINEAR16 audio inline.
#[derive(Debug, Clone)]
pub struct GoogleSpeechBackend {
    api_key: String,
    base_url: String,
    language: String,
    model: Option<String>,
    timeout: Duration,
}

impl GoogleSpeechBackend {
    pub fn new(api_key: String) -> Self {
        Self::new_with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            model: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_request(&self, waveform: &CanonicalWaveform) -> RecognizeRequest<'_> {
        RecognizeRequest {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: CanonicalWaveform::SAMPLE_RATE,
                audio_channel_count: CanonicalWaveform::CHANNELS,
                language_code: &self.language,
                model: self.model.as_deref(),
            },
            audio: RecognitionAudio {
                content: BASE64.encode(waveform.pcm_le_bytes()),
            },
        }
    }
}

#[async_trait]
impl RecognitionBackend for GoogleSpeechBackend {
    fn name(&self) -> &str {
        "google"
    }

    async fn recognize(&self, waveform: &CanonicalWaveform) -> Result<String, BackendError> {
        if self.api_key.trim().is_empty() {
            return Err(BackendError::Service(
                "missing Google API key".to_string(),
            ));
        }

        let url = format!("{}/speech:recognize", trim_trailing_slash(&self.base_url));
        let payload = self.build_request(waveform);

        tracing::debug!(
            language = %self.language,
            samples = waveform.len(),
            "sending audio to Google Speech-to-Text"
        );

        with_timeout(self.timeout, async {
            let response = shared_client()
                .post(url)
                .query(&[("key", self.api_key.as_str())])
                .json(&payload)
                .send()
                .await?;

            parse_recognize_response(response).await
        })
        .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    audio_channel_count: u16,
    language_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechRecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionResult {
    #[serde(default)]
    alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechRecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

async fn parse_recognize_response(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status().as_u16();
    let body = response.text().await?;
    if !(200..300).contains(&status) {
        return Err(status_to_error(status, &body));
    }

    let parsed: RecognizeResponse = serde_json::from_str(&body)?;
    transcript_from_results(&parsed.results)
}

/// Join the top alternative of each result; nothing recognized is unintelligible.
fn transcript_from_results(results: &[SpeechRecognitionResult]) -> Result<String, BackendError> {
    let text = results
        .iter()
        .filter_map(|result| result.alternatives.first())
        .map(|alt| alt.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return Err(BackendError::Unintelligible);
    }
    Ok(text)
}
