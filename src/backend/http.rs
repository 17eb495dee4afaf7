//! Shared HTTP client and backend error extraction.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use super::BackendError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Per-call deadlines are applied with [`crate::util::timeout::with_timeout`].
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Authorization header for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

pub fn trim_trailing_slash(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Map a non-success HTTP status to a service error.
///
/// Both Google and OpenAI wrap failures as `{"error": {"message": ...}}`;
/// the raw body is used when it is not shaped that way.
pub fn status_to_error(status: u16, body: &str) -> BackendError {
    let message = extract_error_message(body).unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        BackendError::Service(format!("HTTP {status}"))
    } else {
        BackendError::Service(format!("HTTP {status}: {message}"))
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(|message| message.as_str())
        .map(ToString::to_string)
}
