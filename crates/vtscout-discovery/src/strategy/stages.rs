//! The individual retrieval stages. Each stage is platform-agnostic: it
//! talks to a [`PlatformApi`] and reads sizes from the [`StrategyProfile`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use super::StrategyProfile;
use crate::api::PlatformApi;
use crate::classifier::{has_performer_tags, Classifier, CONTENT_INDICATORS};
use crate::error::DiscoveryError;
use crate::matcher::{fuzzy_match, loose_match, strict_match};
use crate::types::{Candidate, DiscoveredPerformer, RawUser, ScoreResult, SearchStage};

pub(super) struct StageContext<'a, A: PlatformApi + ?Sized> {
    pub api: &'a A,
    pub classifier: &'a Classifier,
    pub profile: &'a StrategyProfile,
    pub now: DateTime<Utc>,
}

impl<A: PlatformApi + ?Sized> StageContext<'_, A> {
    fn accept(
        &self,
        candidate: &Candidate,
        score: &ScoreResult,
        stage: Option<SearchStage>,
    ) -> DiscoveredPerformer {
        DiscoveredPerformer::from_candidate(
            self.profile.platform,
            candidate,
            score,
            self.classifier.language_focus(candidate),
            stage,
            self.now,
        )
    }

    async fn users_by_id(
        &self,
        ids: Vec<String>,
    ) -> Result<HashMap<String, RawUser>, DiscoveryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(self
            .api
            .get_user_info(&ids)
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect())
    }
}

fn missing_detail(stage: &str, id: &str) {
    tracing::debug!(stage, id, "no detail record for candidate, skipping");
}

/// Tag hits are accepted on tag evidence alone; the score is informational.
pub(super) async fn tag_stage<A: PlatformApi + ?Sized>(
    ctx: &StageContext<'_, A>,
    query: &str,
) -> Result<Vec<DiscoveredPerformer>, DiscoveryError> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    for tag_query in ctx.profile.tag_queries(query) {
        for channel in ctx
            .api
            .search_channels(&tag_query, ctx.profile.tag_search_size)
            .await?
        {
            let name_hit = loose_match(&channel.display_name, query)
                || channel
                    .login
                    .as_deref()
                    .is_some_and(|login| loose_match(login, query));
            if name_hit && seen.insert(channel.id.clone()) {
                hits.push(channel);
            }
        }
    }
    if hits.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = hits.iter().map(|c| c.id.clone()).collect();
    // Search payload tags already count, so a failed lookup only loses extras.
    let extra_tags = match ctx.api.get_channel_tags(&ids).await {
        Ok(tags) => tags,
        Err(e) if e.is_auth_failure() => return Err(e),
        Err(e) => {
            tracing::warn!(
                platform = %ctx.profile.platform,
                error = %e,
                "channel tag lookup failed, using search tags only"
            );
            HashMap::new()
        }
    };
    let users = ctx.users_by_id(ids).await?;

    let mut accepted = Vec::new();
    for channel in &hits {
        let Some(user) = users.get(&channel.id) else {
            missing_detail("tags", &channel.id);
            continue;
        };
        let mut candidate = Candidate::from_channel(channel, user);
        if let Some(tags) = extra_tags.get(&channel.id) {
            candidate.add_tags(tags);
        }
        let (found, matched) = has_performer_tags(&candidate.tags);
        if !found {
            continue;
        }
        let mut score = ctx
            .classifier
            .score_with_tags(&candidate, ctx.profile.platform);
        score
            .reasons
            .push(format!("accepted on performer tags: {}", matched.join(", ")));
        accepted.push(ctx.accept(&candidate, &score, Some(SearchStage::Tags)));
    }
    Ok(accepted)
}

/// Broad name search gated by the fuzzy matcher and the adaptive score.
pub(super) async fn fuzzy_stage<A: PlatformApi + ?Sized>(
    ctx: &StageContext<'_, A>,
    query: &str,
) -> Result<Vec<DiscoveredPerformer>, DiscoveryError> {
    let channels: Vec<_> = ctx
        .api
        .search_channels(query, ctx.profile.fuzzy_search_size)
        .await?
        .into_iter()
        .filter(|c| fuzzy_match(&c.display_name, query))
        .collect();
    if channels.is_empty() {
        return Ok(Vec::new());
    }

    let users = ctx
        .users_by_id(channels.iter().map(|c| c.id.clone()).collect())
        .await?;

    let platform = ctx.profile.platform;
    let mut accepted = Vec::new();
    for channel in &channels {
        let Some(user) = users.get(&channel.id) else {
            missing_detail("fuzzy", &channel.id);
            continue;
        };
        let candidate = Candidate::from_channel(channel, user);
        let score = ctx
            .classifier
            .adaptive_score_at(&candidate, platform, ctx.now);
        if ctx.classifier.accepts_adaptive(&score, platform) {
            accepted.push(ctx.accept(&candidate, &score, Some(SearchStage::Fuzzy)));
        }
    }
    Ok(accepted)
}

fn mentions_performer_content(candidate: &Candidate) -> bool {
    let title = candidate.title.to_lowercase();
    let description = candidate.description.to_lowercase();
    CONTENT_INDICATORS
        .iter()
        .any(|term| title.contains(term) || description.contains(term))
}

/// Live-content search: needs a content indicator, a strict name match and
/// an adaptive score within tolerance of the threshold.
pub(super) async fn content_stage<A: PlatformApi + ?Sized>(
    ctx: &StageContext<'_, A>,
    query: &str,
) -> Result<Vec<DiscoveredPerformer>, DiscoveryError> {
    let streams = ctx
        .api
        .search_live_streams(query, ctx.profile.content_search_size)
        .await?;
    if streams.is_empty() {
        return Ok(Vec::new());
    }

    let users = ctx
        .users_by_id(streams.iter().map(|s| s.user_id.clone()).collect())
        .await?;

    let platform = ctx.profile.platform;
    let policy = ctx.classifier.policy(platform);
    let mut accepted = Vec::new();
    for stream in &streams {
        let Some(user) = users.get(&stream.user_id) else {
            missing_detail("content", &stream.user_id);
            continue;
        };
        let candidate = Candidate::from_stream(stream, user);
        if !mentions_performer_content(&candidate)
            || !strict_match(&candidate.display_name, query)
        {
            continue;
        }
        let score = ctx
            .classifier
            .adaptive_score_at(&candidate, platform, ctx.now);
        if score.score >= policy.content_cutoff(score.threshold) {
            accepted.push(ctx.accept(&candidate, &score, Some(SearchStage::Content)));
        }
    }
    Ok(accepted)
}

/// Single-pass retrieval for the fallbacks: live hits then channel hits,
/// detail lookup and strict name match. Acceptance happens in
/// [`accept_traditional`] and [`accept_permissive`].
pub(super) async fn fallback_pool<A: PlatformApi + ?Sized>(
    ctx: &StageContext<'_, A>,
    query: &str,
) -> Result<Vec<Candidate>, DiscoveryError> {
    let live = if ctx.profile.fallback_includes_live {
        ctx.api
            .search_live_streams(query, ctx.profile.fallback_live_size)
            .await?
    } else {
        Vec::new()
    };
    let channels = ctx
        .api
        .search_channels(query, ctx.profile.fallback_search_size)
        .await?;

    let mut seen = HashSet::new();
    let ids: Vec<String> = live
        .iter()
        .map(|s| s.user_id.clone())
        .chain(channels.iter().map(|c| c.id.clone()))
        .filter(|id| seen.insert(id.clone()))
        .collect();
    let users = ctx.users_by_id(ids).await?;

    let mut emitted = HashSet::new();
    let mut pool = Vec::new();
    let from_live = live.iter().filter_map(|stream| {
        users
            .get(&stream.user_id)
            .map(|user| Candidate::from_stream(stream, user))
    });
    let from_channels = channels.iter().filter_map(|channel| {
        users
            .get(&channel.id)
            .map(|user| Candidate::from_channel(channel, user))
    });
    for candidate in from_live.chain(from_channels) {
        if strict_match(&candidate.display_name, query) && emitted.insert(candidate.id.clone()) {
            pool.push(candidate);
        }
    }
    Ok(pool)
}

pub(super) fn accept_traditional<A: PlatformApi + ?Sized>(
    ctx: &StageContext<'_, A>,
    pool: &[Candidate],
) -> Vec<DiscoveredPerformer> {
    let platform = ctx.profile.platform;
    pool.iter()
        .filter(|c| {
            !ctx.profile.fallback_requires_verified_offline || c.is_live || c.is_verified()
        })
        .filter_map(|candidate| {
            let score = ctx.classifier.score(candidate, platform);
            score
                .passes()
                .then(|| ctx.accept(candidate, &score, None))
        })
        .collect()
}

pub(super) fn accept_permissive<A: PlatformApi + ?Sized>(
    ctx: &StageContext<'_, A>,
    pool: &[Candidate],
) -> Vec<DiscoveredPerformer> {
    let platform = ctx.profile.platform;
    let cutoff = ctx.classifier.policy(platform).permissive_cutoff;
    pool.iter()
        .filter_map(|candidate| {
            let mut score = ctx.classifier.score(candidate, platform);
            score.threshold = cutoff;
            score
                .passes()
                .then(|| ctx.accept(candidate, &score, Some(SearchStage::Permissive)))
        })
        .collect()
}
