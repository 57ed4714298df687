use vtscout_core::Platform;

/// Per-platform shape of the staged search: which stages run and how much
/// each one fetches. Scoring thresholds live in the classifier's
/// [`ScoringPolicy`](crate::classifier::ScoringPolicy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyProfile {
    pub platform: Platform,
    /// Run the tag stage first.
    pub tag_stage: bool,
    /// Skip the remaining stages once the tag stage finds anything.
    pub return_early_on_tags: bool,
    /// Appended to the query for extra tag-stage searches.
    pub tag_keywords: Vec<String>,
    pub tag_search_size: usize,
    pub fuzzy_search_size: usize,
    pub content_search_size: usize,
    /// The traditional fallback also searches live broadcasts.
    pub fallback_includes_live: bool,
    pub fallback_live_size: usize,
    pub fallback_search_size: usize,
    /// Offline fallback hits must be partner or affiliate.
    pub fallback_requires_verified_offline: bool,
}

impl StrategyProfile {
    #[must_use]
    pub fn twitch() -> Self {
        Self {
            platform: Platform::Twitch,
            tag_stage: true,
            return_early_on_tags: true,
            tag_keywords: vec![
                "vtuber".to_string(),
                "envtuber".to_string(),
                "vtuberita".to_string(),
            ],
            tag_search_size: 20,
            fuzzy_search_size: 100,
            content_search_size: 50,
            fallback_includes_live: true,
            fallback_live_size: 50,
            fallback_search_size: 100,
            fallback_requires_verified_offline: true,
        }
    }

    #[must_use]
    pub fn youtube() -> Self {
        Self {
            platform: Platform::YouTube,
            tag_stage: false,
            return_early_on_tags: false,
            tag_keywords: Vec::new(),
            tag_search_size: 0,
            fuzzy_search_size: 50,
            content_search_size: 50,
            fallback_includes_live: false,
            fallback_live_size: 0,
            fallback_search_size: 50,
            fallback_requires_verified_offline: false,
        }
    }

    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Twitch => Self::twitch(),
            Platform::YouTube => Self::youtube(),
        }
    }

    /// The plain query followed by the query combined with each tag keyword.
    #[must_use]
    pub fn tag_queries(&self, query: &str) -> Vec<String> {
        std::iter::once(query.to_string())
            .chain(
                self.tag_keywords
                    .iter()
                    .filter(|kw| !query.to_lowercase().contains(kw.as_str()))
                    .map(|kw| format!("{query} {kw}")),
            )
            .collect()
    }
}
