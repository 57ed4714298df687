//! Per-platform staged search.
//!
//! A query walks `TagSearch → FuzzySearch → ContentSearch`, concatenating
//! stage outputs. If nothing was accepted, the traditional fallback runs and
//! then, as a last resort, the permissive fallback over the same pool.

mod profile;
mod stages;

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use vtscout_core::Platform;

use crate::aggregate::{dedupe, rank};
use crate::api::PlatformApi;
use crate::classifier::Classifier;
use crate::error::DiscoveryError;
use crate::types::{Candidate, DiscoveredPerformer};

pub use profile::StrategyProfile;
use stages::StageContext;

/// Finds performers on one platform.
#[async_trait]
pub trait PlatformStrategy: Send + Sync {
    fn platform(&self) -> Platform;

    /// Deduplicated and ranked performers for `query`.
    ///
    /// # Errors
    ///
    /// Returns the first auth failure. Every other stage error is logged and
    /// treated as an empty stage.
    async fn find_performers(
        &self,
        query: &str,
    ) -> Result<Vec<DiscoveredPerformer>, DiscoveryError>;
}

#[derive(Debug)]
enum SearchState {
    TagSearch,
    FuzzySearch,
    ContentSearch,
    FallbackTraditional,
    Permissive(Vec<Candidate>),
    Done,
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchState::TagSearch => "tags",
            SearchState::FuzzySearch => "fuzzy",
            SearchState::ContentSearch => "content",
            SearchState::FallbackTraditional => "traditional",
            SearchState::Permissive(_) => "permissive",
            SearchState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Contains a stage failure: auth errors propagate, everything else is
/// logged and becomes an empty stage.
fn contain<T>(
    platform: Platform,
    stage: &str,
    outcome: Result<Vec<T>, DiscoveryError>,
) -> Result<Vec<T>, DiscoveryError> {
    match outcome {
        Ok(found) => {
            tracing::info!(%platform, stage, found = found.len(), "search stage complete");
            Ok(found)
        }
        Err(e) if e.is_auth_failure() => Err(e),
        Err(e) => {
            tracing::warn!(%platform, stage, error = %e, "search stage failed, continuing");
            Ok(Vec::new())
        }
    }
}

/// The staged search over any [`PlatformApi`].
pub struct StagedSearch<A> {
    api: A,
    classifier: Classifier,
    profile: StrategyProfile,
}

impl<A: PlatformApi> StagedSearch<A> {
    /// Uses the default profile and classifier for the API's platform.
    #[must_use]
    pub fn new(api: A) -> Self {
        let profile = StrategyProfile::for_platform(api.platform());
        Self::with_profile(api, Classifier::new(), profile)
    }

    #[must_use]
    pub fn with_profile(api: A, classifier: Classifier, profile: StrategyProfile) -> Self {
        Self {
            api,
            classifier,
            profile,
        }
    }

    async fn run(&self, query: &str) -> Result<Vec<DiscoveredPerformer>, DiscoveryError> {
        let platform = self.profile.platform;
        let ctx = StageContext {
            api: &self.api,
            classifier: &self.classifier,
            profile: &self.profile,
            now: Utc::now(),
        };

        let mut results = Vec::new();
        let mut state = if self.profile.tag_stage {
            SearchState::TagSearch
        } else {
            SearchState::FuzzySearch
        };

        loop {
            let label = state.to_string();
            state = match state {
                SearchState::TagSearch => {
                    let found = contain(platform, &label, stages::tag_stage(&ctx, query).await)?;
                    let done = !found.is_empty() && self.profile.return_early_on_tags;
                    results.extend(found);
                    if done {
                        SearchState::Done
                    } else {
                        SearchState::FuzzySearch
                    }
                }
                SearchState::FuzzySearch => {
                    results.extend(contain(
                        platform,
                        &label,
                        stages::fuzzy_stage(&ctx, query).await,
                    )?);
                    SearchState::ContentSearch
                }
                SearchState::ContentSearch => {
                    results.extend(contain(
                        platform,
                        &label,
                        stages::content_stage(&ctx, query).await,
                    )?);
                    if results.is_empty() {
                        SearchState::FallbackTraditional
                    } else {
                        SearchState::Done
                    }
                }
                SearchState::FallbackTraditional => {
                    let pool = contain(platform, &label, stages::fallback_pool(&ctx, query).await)?;
                    let accepted = stages::accept_traditional(&ctx, &pool);
                    tracing::info!(%platform, accepted = accepted.len(), "traditional fallback");
                    if accepted.is_empty() {
                        SearchState::Permissive(pool)
                    } else {
                        results.extend(accepted);
                        SearchState::Done
                    }
                }
                SearchState::Permissive(pool) => {
                    let accepted = stages::accept_permissive(&ctx, &pool);
                    tracing::info!(%platform, accepted = accepted.len(), "permissive fallback");
                    results.extend(accepted);
                    SearchState::Done
                }
                SearchState::Done => break,
            };
        }

        Ok(rank(dedupe(results), platform))
    }
}

#[async_trait]
impl<A: PlatformApi> PlatformStrategy for StagedSearch<A> {
    fn platform(&self) -> Platform {
        self.profile.platform
    }

    async fn find_performers(
        &self,
        query: &str,
    ) -> Result<Vec<DiscoveredPerformer>, DiscoveryError> {
        let query = query.trim();
        tracing::info!(platform = %self.profile.platform, query, "starting staged search");
        let found = self.run(query).await?;
        tracing::info!(
            platform = %self.profile.platform,
            query,
            found = found.len(),
            "staged search complete"
        );
        Ok(found)
    }
}
