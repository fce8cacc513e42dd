//! Clients for the external workflow-automation webhooks.
//!
//! Both clients share the same transport policy: a bounded request
//! timeout plus a single retry with jitter on connect/timeout failures.
//! The original integration had neither; the bounded timeout and single
//! retry are a deliberate hardening of that contract.

pub mod chat;
pub mod enhance;

use crate::error::ApiError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Base delay before the single retry.
const RETRY_BASE_MS: u64 = 500;
/// Jitter range applied to the retry delay (±).
const RETRY_JITTER_MS: u64 = 250;

/// Build the shared HTTP client with the configured request timeout.
pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Compute jittered delay for retry.
/// Uses system time nanoseconds for simple jitter without requiring rand crate.
pub(crate) fn jittered_delay(base_ms: u64, jitter_ms: u64) -> Duration {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);

    // Map nanos to range [-jitter_ms, +jitter_ms]
    let jitter_range = (jitter_ms * 2) as i64;
    let jitter = if jitter_range > 0 {
        (nanos as i64 % jitter_range) - (jitter_ms as i64)
    } else {
        0
    };

    let delay_ms = (base_ms as i64 + jitter).max(50) as u64;
    Duration::from_millis(delay_ms)
}

/// POST a JSON payload, retrying once on connect/timeout failures.
///
/// Non-success HTTP statuses are returned to the caller as-is; only
/// transport-level failures trigger the retry.
pub(crate) async fn post_json_with_retry<T: Serialize>(
    http: &reqwest::Client,
    url: &str,
    payload: &T,
) -> Result<reqwest::Response, ApiError> {
    match http.post(url).json(payload).send().await {
        Ok(response) => Ok(response),
        Err(err) if err.is_timeout() || err.is_connect() => {
            let delay = jittered_delay(RETRY_BASE_MS, RETRY_JITTER_MS);
            debug!(
                url = %url,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "webhook call failed, retrying once"
            );
            tokio::time::sleep(delay).await;

            http.post(url).json(payload).send().await.map_err(|err| {
                ApiError::Upstream(format!("webhook call to {url} failed after retry: {err}"))
            })
        }
        Err(err) => Err(ApiError::Upstream(format!(
            "webhook call to {url} failed: {err}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jittered_delay_stays_within_bounds() {
        for _ in 0..100 {
            let delay = jittered_delay(500, 250);
            assert!(delay >= Duration::from_millis(250));
            assert!(delay <= Duration::from_millis(750));
        }
    }

    #[test]
    fn jittered_delay_without_jitter_is_base() {
        assert_eq!(jittered_delay(500, 0), Duration::from_millis(500));
    }
}
