//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::backend::BackendError;

/// Wrap a backend call with a deadline; expiry is a service failure.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, BackendError>>,
) -> Result<T, BackendError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout(duration.as_millis() as u64)),
    }
}
