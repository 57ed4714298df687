//! Retry with exponential back-off and jitter for platform requests.

use std::future::Future;
use std::time::Duration;

use crate::error::DiscoveryError;

/// Transient failures worth another attempt: timeouts, connect errors, 5xx
/// responses and rate limiting. Auth and shape errors are never retried.
pub(crate) fn is_retriable(err: &DiscoveryError) -> bool {
    match err {
        DiscoveryError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        DiscoveryError::UnexpectedStatus { status, .. } => *status >= 500,
        DiscoveryError::RateLimited { .. } => true,
        DiscoveryError::Auth { .. }
        | DiscoveryError::MissingCredentials { .. }
        | DiscoveryError::Deserialize { .. }
        | DiscoveryError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors. Delay doubles per attempt from `backoff_base_ms`, with
/// ±25 % jitter, capped at 30 s. A rate-limit `Retry-After` longer than the
/// computed delay wins.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, DiscoveryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DiscoveryError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let jitter = rand::random::<f64>() * 0.5 + 0.75;
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let jittered = (computed.min(MAX_DELAY_MS) as f64 * jitter) as u64;
                let delay_ms = match &err {
                    DiscoveryError::RateLimited {
                        retry_after_secs, ..
                    } => jittered.max(retry_after_secs.saturating_mul(1_000).min(MAX_DELAY_MS)),
                    _ => jittered,
                };
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient platform error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use vtscout_core::Platform;

    use super::*;

    fn server_error() -> DiscoveryError {
        DiscoveryError::UnexpectedStatus {
            status: 503,
            url: "http://localhost/users".to_owned(),
        }
    }

    #[test]
    fn server_errors_and_rate_limits_are_retriable() {
        assert!(is_retriable(&server_error()));
        assert!(is_retriable(&DiscoveryError::RateLimited {
            platform: Platform::Twitch,
            retry_after_secs: 0,
        }));
    }

    #[test]
    fn client_errors_and_auth_are_not_retriable() {
        assert!(!is_retriable(&DiscoveryError::UnexpectedStatus {
            status: 404,
            url: "http://localhost/users".to_owned(),
        }));
        assert!(!is_retriable(&DiscoveryError::Auth {
            platform: Platform::Twitch,
            reason: "invalid client".to_owned(),
        }));
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_retriable(&DiscoveryError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }));
    }

    #[tokio::test]
    async fn retries_server_errors_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(server_error())
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<u32, _> = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(server_error())
            }
        })
        .await;
        assert!(matches!(
            result,
            Err(DiscoveryError::UnexpectedStatus { status: 503, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_auth_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result: Result<u32, _> = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(DiscoveryError::Auth {
                    platform: Platform::YouTube,
                    reason: "keyInvalid".to_owned(),
                })
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
