use thiserror::Error;
use vtscout_core::Platform;

/// Errors raised while talking to a platform or running a search.
///
/// Transport failures (`Http`, `UnexpectedStatus`, `RateLimited`) are
/// contained per stage. Auth failures abort the platform branch and are
/// contained by the orchestrator.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("rate limited by {platform} (retry after {retry_after_secs}s)")]
    RateLimited {
        platform: Platform,
        retry_after_secs: u64,
    },

    #[error("{platform} rejected credentials: {reason}")]
    Auth { platform: Platform, reason: String },

    #[error("no credentials configured for {platform}")]
    MissingCredentials { platform: Platform },

    /// The response envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl DiscoveryError {
    /// Auth failures are fatal to the whole platform branch; everything else
    /// only empties the stage that hit it.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            DiscoveryError::Auth { .. } | DiscoveryError::MissingCredentials { .. }
        )
    }
}
