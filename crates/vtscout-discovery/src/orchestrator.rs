//! Fans a query out to every configured platform and collects the results.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use vtscout_core::{Credentials, Platform};

use crate::clients::{ClientSettings, TwitchClient, YouTubeClient};
use crate::error::DiscoveryError;
use crate::strategy::{PlatformStrategy, StagedSearch};
use crate::types::DiscoveredPerformer;

/// A platform branch that produced no results because it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformFailure {
    pub platform: Platform,
    pub message: String,
}

/// Per-platform results of one discovery run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryReport {
    pub twitch: Vec<DiscoveredPerformer>,
    pub youtube: Vec<DiscoveredPerformer>,
    pub total_results: usize,
    pub failures: Vec<PlatformFailure>,
}

impl DiscoveryReport {
    fn set_results(&mut self, platform: Platform, results: Vec<DiscoveredPerformer>) {
        match platform {
            Platform::Twitch => self.twitch = results,
            Platform::YouTube => self.youtube = results,
        }
    }

    /// Twitch results followed by YouTube results, each in ranked order.
    pub fn all_results(&self) -> impl Iterator<Item = &DiscoveredPerformer> {
        self.twitch.iter().chain(&self.youtube)
    }
}

enum Branch {
    Ready(Arc<dyn PlatformStrategy>),
    Unavailable { platform: Platform, reason: String },
}

impl Branch {
    fn platform(&self) -> Platform {
        match self {
            Branch::Ready(strategy) => strategy.platform(),
            Branch::Unavailable { platform, .. } => *platform,
        }
    }
}

/// Runs every platform strategy concurrently for the same query.
///
/// Strategies are kept across calls so cached credentials are reused.
pub struct Discovery {
    branches: Vec<Branch>,
}

impl Discovery {
    #[must_use]
    pub fn new(strategies: Vec<Arc<dyn PlatformStrategy>>) -> Self {
        Self {
            branches: strategies.into_iter().map(Branch::Ready).collect(),
        }
    }

    /// Builds one strategy per platform with credentials. Platforms without
    /// credentials are reported as failures on every run.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if an HTTP client cannot be built.
    pub fn from_credentials(
        credentials: &Credentials,
        settings: &ClientSettings,
    ) -> Result<Self, DiscoveryError> {
        let twitch = match &credentials.twitch {
            Some(creds) => Branch::Ready(Arc::new(StagedSearch::new(TwitchClient::new(
                creds.clone(),
                settings,
            )?))),
            None => Branch::Unavailable {
                platform: Platform::Twitch,
                reason: DiscoveryError::MissingCredentials {
                    platform: Platform::Twitch,
                }
                .to_string(),
            },
        };
        let youtube = match &credentials.youtube_api_key {
            Some(key) => Branch::Ready(Arc::new(StagedSearch::new(YouTubeClient::new(
                key, settings,
            )?))),
            None => Branch::Unavailable {
                platform: Platform::YouTube,
                reason: DiscoveryError::MissingCredentials {
                    platform: Platform::YouTube,
                }
                .to_string(),
            },
        };
        for branch in [&twitch, &youtube] {
            if let Branch::Unavailable { platform, .. } = branch {
                tracing::warn!(%platform, "no credentials configured, platform disabled");
            }
        }
        Ok(Self {
            branches: vec![twitch, youtube],
        })
    }

    /// Drops every branch that does not search `platform`.
    #[must_use]
    pub fn restrict_to(mut self, platform: Platform) -> Self {
        self.branches.retain(|branch| branch.platform() == platform);
        self
    }

    /// Platforms with a runnable strategy.
    #[must_use]
    pub fn platforms(&self) -> Vec<Platform> {
        self.branches
            .iter()
            .filter_map(|branch| match branch {
                Branch::Ready(strategy) => Some(strategy.platform()),
                Branch::Unavailable { .. } => None,
            })
            .collect()
    }

    /// Searches every platform for `query`.
    ///
    /// A failing or panicking branch yields no results for its platform and
    /// a [`PlatformFailure`] entry; the other branches are unaffected.
    pub async fn discover(&self, query: &str) -> DiscoveryReport {
        let query = query.trim().to_string();
        let mut report = DiscoveryReport::default();
        let mut platforms = Vec::new();
        let mut tasks = Vec::new();

        for branch in &self.branches {
            match branch {
                Branch::Ready(strategy) => {
                    let strategy = Arc::clone(strategy);
                    let query = query.clone();
                    platforms.push(strategy.platform());
                    tasks.push(tokio::spawn(async move {
                        strategy.find_performers(&query).await
                    }));
                }
                Branch::Unavailable { platform, reason } => report.failures.push(PlatformFailure {
                    platform: *platform,
                    message: reason.clone(),
                }),
            }
        }

        for (platform, outcome) in platforms.into_iter().zip(join_all(tasks).await) {
            match outcome {
                Ok(Ok(results)) => report.set_results(platform, results),
                Ok(Err(e)) => {
                    tracing::warn!(%platform, error = %e, "platform search failed");
                    report.failures.push(PlatformFailure {
                        platform,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(%platform, error = %e, "platform search task aborted");
                    report.failures.push(PlatformFailure {
                        platform,
                        message: format!("search task aborted: {e}"),
                    });
                }
            }
        }

        report.total_results = report.twitch.len() + report.youtube.len();
        tracing::info!(
            query = %query,
            total = report.total_results,
            failures = report.failures.len(),
            "discovery complete"
        );
        report
    }
}
