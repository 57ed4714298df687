//! HTTP clients for the Twitch Helix and YouTube Data APIs.

mod retry;
pub mod twitch;
pub mod youtube;

use std::future::Future;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use vtscout_core::{AppConfig, Platform};

use crate::error::DiscoveryError;

pub use twitch::TwitchClient;
pub use youtube::YouTubeClient;

pub(crate) use retry::retry_with_backoff;

/// Transport settings shared by both clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "vtscout/0.1 (performer-discovery)".to_string(),
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl From<&AppConfig> for ClientSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_ms,
        }
    }
}

impl ClientSettings {
    pub(crate) fn build_http(&self) -> Result<Client, DiscoveryError> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(self.user_agent.as_str())
            .build()?)
    }
}

/// Parses `raw` as a base URL ending in exactly one slash, so relative
/// endpoint paths join under it instead of replacing its last segment.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, DiscoveryError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| DiscoveryError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, DiscoveryError> {
    base.join(path).map_err(|e| DiscoveryError::InvalidBaseUrl {
        url: format!("{base}{path}"),
        reason: e.to_string(),
    })
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(1)
}

/// Maps the HTTP status to the error taxonomy and parses a 2xx body as JSON.
///
/// 429 becomes [`DiscoveryError::RateLimited`]; 401 and rejected API keys
/// become [`DiscoveryError::Auth`]; any other non-2xx becomes
/// [`DiscoveryError::UnexpectedStatus`].
pub(crate) async fn read_json<T: DeserializeOwned>(
    platform: Platform,
    context: &str,
    response: Response,
) -> Result<T, DiscoveryError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(DiscoveryError::RateLimited {
            platform,
            retry_after_secs: retry_after_secs(&response),
        });
    }
    if !status.is_success() {
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || body.contains("keyInvalid") {
            return Err(DiscoveryError::Auth {
                platform,
                reason: format!("{context} returned {status}"),
            });
        }
        return Err(DiscoveryError::UnexpectedStatus {
            status: status.as_u16(),
            url,
        });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| DiscoveryError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Deserializes each record on its own, skipping malformed ones.
pub(crate) fn parse_records<T: DeserializeOwned>(
    platform: Platform,
    context: &str,
    records: Vec<serde_json::Value>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(%platform, context, error = %e, "skipping malformed record");
                None
            }
        })
        .collect()
}

/// Fetches `ids` in chunks of `batch_size`, one chunk at a time.
pub(crate) async fn fetch_in_batches<T, F, Fut>(
    ids: &[String],
    batch_size: usize,
    mut fetch: F,
) -> Result<Vec<T>, DiscoveryError>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, DiscoveryError>>,
{
    let mut out = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(batch_size.max(1)) {
        out.extend(fetch(chunk.to_vec()).await?);
    }
    Ok(out)
}

/// Empty strings from the APIs mean "absent".
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8080/helix").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/helix/");
        let joined = endpoint(&url, "search/channels").unwrap();
        assert_eq!(joined.as_str(), "http://127.0.0.1:8080/helix/search/channels");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(DiscoveryError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn batches_are_chunked_and_sequential() {
        let ids: Vec<String> = (0..7).map(|i| i.to_string()).collect();
        let in_flight = AtomicUsize::new(0);
        let mut sizes = Vec::new();
        let out = fetch_in_batches(&ids, 3, |chunk| {
            sizes.push(chunk.len());
            let in_flight = &in_flight;
            async move {
                assert_eq!(in_flight.fetch_add(1, Ordering::SeqCst), 0);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(chunk)
            }
        })
        .await
        .unwrap();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(out, ids);
    }

    #[test]
    fn malformed_records_are_skipped() {
        #[derive(serde::Deserialize)]
        struct Record {
            id: String,
        }
        let records = vec![
            serde_json::json!({"id": "1"}),
            serde_json::json!({"name": "no id"}),
            serde_json::json!({"id": "3"}),
        ];
        let parsed: Vec<Record> = parse_records(Platform::Twitch, "test", records);
        let ids: Vec<&str> = parsed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
