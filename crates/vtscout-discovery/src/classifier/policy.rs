use vtscout_core::Platform;

/// Thresholds and bonuses for one platform.
///
/// The defaults carry the empirically tuned values per platform. They
/// differ between entry points on purpose and are kept separate rather than
/// unified.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    /// Plain classifier acceptance.
    pub base_threshold: f64,
    /// Tag-aware scoring when the candidate carries tags.
    pub tagged_threshold: f64,
    /// Tag-aware scoring when the candidate carries no tags.
    pub untagged_threshold: f64,
    /// Starting point for the contextual adaptive threshold.
    pub adaptive_threshold: f64,
    /// Adaptive scores at or above this pass even below the threshold.
    pub moderate_floor: Option<f64>,
    /// Last-resort fallback cutoff.
    pub permissive_cutoff: f64,
    /// Viewer count (Twitch) or subscriber count (YouTube) that earns a bonus.
    pub audience_cutoff: u64,
    pub recency_window_days: i64,
    pub live_bonus: f64,
    pub verified_bonus: f64,
    pub audience_bonus: f64,
    pub recency_bonus: f64,
    /// Threshold reduction when a performer tag corroborates the candidate.
    pub tag_hit_discount: f64,
    /// Threshold reduction for a live candidate.
    pub live_discount: f64,
    /// Threshold increase when neither a tag hit nor live status backs the
    /// candidate.
    pub uncorroborated_premium: f64,
    /// How far below threshold the content stage still accepts.
    pub content_tolerance: f64,
    pub content_floor: f64,
}

impl ScoringPolicy {
    #[must_use]
    pub fn twitch() -> Self {
        Self {
            base_threshold: 3.0,
            tagged_threshold: 2.0,
            untagged_threshold: 3.0,
            adaptive_threshold: 2.0,
            moderate_floor: None,
            permissive_cutoff: 1.0,
            audience_cutoff: 100,
            recency_window_days: 7,
            live_bonus: 1.0,
            verified_bonus: 2.0,
            audience_bonus: 1.0,
            recency_bonus: 0.5,
            tag_hit_discount: 1.0,
            live_discount: 0.5,
            uncorroborated_premium: 0.5,
            content_tolerance: 1.0,
            content_floor: 1.0,
        }
    }

    #[must_use]
    pub fn youtube() -> Self {
        Self {
            base_threshold: 2.5,
            tagged_threshold: 1.0,
            untagged_threshold: 1.5,
            moderate_floor: Some(1.5),
            audience_cutoff: 1_000,
            ..Self::twitch()
        }
    }

    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Twitch => Self::twitch(),
            Platform::YouTube => Self::youtube(),
        }
    }

    /// Content-stage cutoff derived from an adaptive threshold.
    #[must_use]
    pub fn content_cutoff(&self, adaptive_threshold: f64) -> f64 {
        (adaptive_threshold - self.content_tolerance).max(self.content_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platforms_use_different_base_thresholds() {
        assert!((ScoringPolicy::twitch().base_threshold - 3.0).abs() < f64::EPSILON);
        assert!((ScoringPolicy::youtube().base_threshold - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn youtube_keeps_shared_bonuses() {
        let youtube = ScoringPolicy::youtube();
        assert_eq!(youtube.audience_cutoff, 1_000);
        assert_eq!(youtube.moderate_floor, Some(1.5));
        assert!((youtube.recency_bonus - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn content_cutoff_never_drops_below_floor() {
        let policy = ScoringPolicy::twitch();
        assert!((policy.content_cutoff(3.0) - 2.0).abs() < f64::EPSILON);
        assert!((policy.content_cutoff(1.5) - 1.0).abs() < f64::EPSILON);
    }
}
