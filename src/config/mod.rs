//! Configuration system (layered: code > env > config file > defaults).

mod error;

pub use error::ConfigError;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::backend::RecognitionBackend;
use crate::intake::{IntakeValidator, MAX_UPLOAD_BYTES};
use crate::pipeline::TranscriptionPipeline;

pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Which recognition service to call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackendKind {
    #[default]
    Google,
    OpenAi,
}

impl BackendKind {
    /// Provider-specific env var consulted when `HARK_API_KEY` is unset.
    pub fn api_key_env(self) -> &'static str {
        match self {
            BackendKind::Google => "GOOGLE_API_KEY",
            BackendKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// On-disk TOML layout; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub backend: Option<BackendKind>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_upload_bytes: Option<u64>,
    pub bind: Option<String>,
}

/// Resolved settings for the pipeline and its backend.
#[derive(Clone, PartialEq, Eq)]
pub struct HarkConfig {
    pub backend: BackendKind,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub language: String,
    pub timeout: Duration,
    pub max_upload_bytes: u64,
    pub bind_addr: String,
}

impl fmt::Debug for HarkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarkConfig")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .field("timeout", &self.timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl Default for HarkConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            api_key: None,
            base_url: None,
            model: None,
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl HarkConfig {
    /// Load `.env`, the config file (`HARK_CONFIG` or `~/.hark/config.toml`),
    /// then process environment variables on top.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|_| None)
    }

    /// Like [`from_env`](Self::from_env), with `overrides` consulted before
    /// the process environment (used for command-line flags).
    pub fn from_env_with(
        overrides: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let path = overrides("HARK_CONFIG")
            .or_else(|| std::env::var("HARK_CONFIG").ok())
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        Self::load(Some(&path), |key| {
            overrides(key).or_else(|| std::env::var(key).ok())
        })
    }

    /// Build from an optional config file and an env lookup.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            if let Some(file) = read_config_file(path)? {
                config.apply_file(file);
            }
        }
        config.apply_env(env)?;
        Ok(config)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(backend) = file.backend {
            self.backend = backend;
        }
        if file.api_key.is_some() {
            self.api_key = file.api_key;
        }
        if file.base_url.is_some() {
            self.base_url = file.base_url;
        }
        if file.model.is_some() {
            self.model = file.model;
        }
        if let Some(language) = file.language {
            self.language = language;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(max) = file.max_upload_bytes {
            self.max_upload_bytes = max;
        }
        if let Some(bind) = file.bind {
            self.bind_addr = bind;
        }
    }

    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = var("HARK_BACKEND") {
            self.backend = raw.trim().parse().map_err(|_| invalid("HARK_BACKEND", &raw))?;
        }
        if let Some(key) = var("HARK_API_KEY") {
            self.api_key = Some(key);
        } else if self.api_key.is_none() {
            self.api_key = var(self.backend.api_key_env());
        }
        if let Some(url) = var("HARK_BASE_URL") {
            self.base_url = Some(url);
        }
        if let Some(model) = var("HARK_MODEL") {
            self.model = Some(model);
        }
        if let Some(language) = var("HARK_LANGUAGE") {
            self.language = language;
        }
        if let Some(raw) = var("HARK_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("HARK_TIMEOUT_SECS", &raw))?;
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = var("HARK_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = raw
                .trim()
                .parse()
                .map_err(|_| invalid("HARK_MAX_UPLOAD_BYTES", &raw))?;
        }
        if let Some(bind) = var("HARK_BIND") {
            self.bind_addr = bind;
        }
        Ok(())
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn intake_validator(&self) -> IntakeValidator {
        IntakeValidator::new(self.max_upload_bytes)
    }

    /// Construct the configured recognition backend.
    pub fn build_backend(&self) -> Result<Arc<dyn RecognitionBackend>, ConfigError> {
        let api_key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                backend: self.backend.to_string(),
            })?;

        match self.backend {
            #[cfg(feature = "google")]
            BackendKind::Google => {
                use crate::backend::google::{GoogleSpeechBackend, DEFAULT_BASE_URL};
                let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
                let mut backend = GoogleSpeechBackend::new_with_base_url(api_key, base_url)
                    .with_language(self.language.clone())
                    .with_timeout(self.timeout);
                if let Some(model) = &self.model {
                    backend = backend.with_model(model.clone());
                }
                Ok(Arc::new(backend))
            }
            #[cfg(feature = "openai")]
            BackendKind::OpenAi => {
                use crate::backend::openai::{OpenAiWhisperBackend, DEFAULT_BASE_URL};
                let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
                let mut backend = OpenAiWhisperBackend::new_with_base_url(api_key, base_url)
                    .with_language(self.language.clone())
                    .with_timeout(self.timeout);
                if let Some(model) = &self.model {
                    backend = backend.with_model(model.clone());
                }
                Ok(Arc::new(backend))
            }
            #[allow(unreachable_patterns)]
            other => Err(ConfigError::UnsupportedBackend(other.to_string())),
        }
    }

    /// Validator plus backend, ready to serve requests.
    pub fn build_pipeline(&self) -> Result<TranscriptionPipeline, ConfigError> {
        Ok(TranscriptionPipeline::new(
            self.intake_validator(),
            self.build_backend()?,
        ))
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn read_config_file(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            })
        }
    };
    let file = toml::from_str(&raw).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(file))
}

/// `~/.hark/config.toml`.
pub fn default_config_path() -> PathBuf {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().join(".hark"))
        .unwrap_or_else(|| PathBuf::from(".hark"))
        .join("config.toml")
}
