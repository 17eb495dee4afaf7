use thiserror::Error;

/// Startup configuration failures; these never reach a pipeline caller.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid config file {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Missing API key for {backend} backend (set HARK_API_KEY)")]
    MissingApiKey { backend: String },
    #[error("Backend not compiled in: {0}")]
    UnsupportedBackend(String),
}
