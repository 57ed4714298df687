use chrono::{DateTime, TimeDelta, Utc};
use vtscout_core::Platform;

use super::{base_tally, has_performer_tags, Classifier};
use crate::types::{Candidate, ScoreResult};

impl Classifier {
    /// Adaptive score evaluated against the current time.
    #[must_use]
    pub fn adaptive_score(&self, candidate: &Candidate, platform: Platform) -> ScoreResult {
        self.adaptive_score_at(candidate, platform, Utc::now())
    }

    /// Base score plus contextual bonuses, compared against a threshold that
    /// moves with the strength of corroborating context.
    #[must_use]
    pub fn adaptive_score_at(
        &self,
        candidate: &Candidate,
        platform: Platform,
        now: DateTime<Utc>,
    ) -> ScoreResult {
        let policy = self.policy(platform);
        let mut tally = base_tally(candidate);

        if candidate.is_live {
            tally.flag("live now", policy.live_bonus);
        }
        if candidate.is_verified() {
            tally.flag(
                format!(
                    "verified channel ({})",
                    candidate.broadcaster_type.as_deref().unwrap_or_default()
                ),
                policy.verified_bonus,
            );
        }

        let (audience_label, audience) = match platform {
            Platform::Twitch => ("viewers", candidate.viewer_count),
            Platform::YouTube => ("subscribers", candidate.subscriber_count),
        };
        if let Some(count) = audience.filter(|count| *count > policy.audience_cutoff) {
            tally.flag(
                format!("large audience ({count} {audience_label})"),
                policy.audience_bonus,
            );
        }

        let recent = candidate.discovered_at.is_some_and(|at| {
            TimeDelta::try_days(policy.recency_window_days).is_some_and(|window| now - at < window)
        });
        if recent {
            tally.flag("recent activity", policy.recency_bonus);
        }

        let (tag_hit, _) = has_performer_tags(&candidate.tags);
        let mut threshold = policy.adaptive_threshold;
        if tag_hit {
            threshold -= policy.tag_hit_discount;
        }
        if candidate.is_live {
            threshold -= policy.live_discount;
        }
        if !tag_hit && !candidate.is_live {
            threshold += policy.uncorroborated_premium;
        }

        tally.into_result(threshold)
    }

    /// Applies the platform's moderate floor on top of the adaptive threshold.
    #[must_use]
    pub fn accepts_adaptive(&self, result: &ScoreResult, platform: Platform) -> bool {
        result.passes()
            || self
                .policy(platform)
                .moderate_floor
                .is_some_and(|floor| result.score >= floor)
    }
}
