//! Raw platform records and the normalized shapes the pipeline works on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vtscout_core::Platform;

/// A channel search hit, before any detail lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChannel {
    pub id: String,
    pub login: Option<String>,
    pub display_name: String,
    pub title: Option<String>,
    pub is_live: bool,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

/// A live broadcast hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStream {
    pub user_id: String,
    pub user_login: Option<String>,
    pub user_name: String,
    pub title: String,
    pub is_live: bool,
    pub viewer_count: Option<u64>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl From<RawChannel> for RawStream {
    fn from(channel: RawChannel) -> Self {
        Self {
            user_id: channel.id,
            user_login: channel.login,
            user_name: channel.display_name,
            title: channel.title.unwrap_or_default(),
            is_live: channel.is_live,
            viewer_count: None,
            language: channel.language,
            tags: channel.tags,
            started_at: channel.started_at,
        }
    }
}

/// Per-id account details (Twitch user, YouTube channel resource).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawUser {
    pub id: String,
    pub login: Option<String>,
    pub display_name: String,
    pub description: String,
    pub avatar_url: Option<String>,
    pub broadcaster_type: Option<String>,
    pub language: Option<String>,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
    pub tags: Vec<String>,
}

/// Platform-agnostic record scored by the classifier and matched by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub login: Option<String>,
    pub display_name: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub language: Option<String>,
    pub avatar_url: Option<String>,
    pub is_live: bool,
    pub broadcaster_type: Option<String>,
    pub viewer_count: Option<u64>,
    pub subscriber_count: Option<u64>,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
    pub discovered_at: Option<DateTime<Utc>>,
}

fn merge_tags(first: &[String], second: &[String]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for tag in first.iter().chain(second) {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            tags.push(tag.clone());
        }
    }
    tags
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

impl Candidate {
    /// Merges a search hit with its detail record. Detail fields win where
    /// both carry a value.
    #[must_use]
    pub fn from_channel(channel: &RawChannel, user: &RawUser) -> Self {
        Self {
            id: channel.id.clone(),
            login: user.login.clone().or_else(|| channel.login.clone()),
            display_name: non_empty(&user.display_name)
                .unwrap_or(&channel.display_name)
                .to_string(),
            title: channel.title.clone().unwrap_or_default(),
            description: user.description.clone(),
            tags: merge_tags(&channel.tags, &user.tags),
            language: user.language.clone().or_else(|| channel.language.clone()),
            avatar_url: user
                .avatar_url
                .clone()
                .or_else(|| channel.thumbnail_url.clone()),
            is_live: channel.is_live,
            broadcaster_type: user.broadcaster_type.clone(),
            viewer_count: None,
            subscriber_count: user.subscriber_count,
            view_count: user.view_count,
            video_count: user.video_count,
            discovered_at: channel.started_at,
        }
    }

    #[must_use]
    pub fn from_stream(stream: &RawStream, user: &RawUser) -> Self {
        Self {
            id: stream.user_id.clone(),
            login: user.login.clone().or_else(|| stream.user_login.clone()),
            display_name: non_empty(&user.display_name)
                .unwrap_or(&stream.user_name)
                .to_string(),
            title: stream.title.clone(),
            description: user.description.clone(),
            tags: merge_tags(&stream.tags, &user.tags),
            language: stream.language.clone().or_else(|| user.language.clone()),
            avatar_url: user.avatar_url.clone(),
            is_live: stream.is_live,
            broadcaster_type: user.broadcaster_type.clone(),
            viewer_count: stream.viewer_count,
            subscriber_count: user.subscriber_count,
            view_count: user.view_count,
            video_count: user.video_count,
            discovered_at: stream.started_at,
        }
    }

    /// Partner or affiliate on Twitch.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(
            self.broadcaster_type.as_deref(),
            Some("partner" | "affiliate")
        )
    }

    pub fn add_tags(&mut self, extra: &[String]) {
        self.tags = merge_tags(&self.tags, extra);
    }
}

/// Outcome of scoring one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub reasons: Vec<String>,
    pub threshold: f64,
}

impl ScoreResult {
    #[must_use]
    pub fn passes(&self) -> bool {
        self.score >= self.threshold
    }
}

/// Which pipeline stage accepted a performer. Fallback results carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStage {
    Tags,
    Fuzzy,
    Content,
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AudienceMetrics {
    Twitch {
        #[serde(rename = "isLive")]
        is_live: bool,
        #[serde(rename = "broadcasterType")]
        broadcaster_type: String,
        #[serde(rename = "viewerCount")]
        viewer_count: u64,
        #[serde(rename = "streamTitle")]
        stream_title: String,
    },
    YouTube {
        #[serde(rename = "subscriberCount")]
        subscriber_count: u64,
        #[serde(rename = "videoCount")]
        video_count: u64,
        #[serde(rename = "viewCount")]
        view_count: u64,
    },
}

/// The externally visible result record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredPerformer {
    pub platform: Platform,
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub description: String,
    pub url: String,
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub metrics: AudienceMetrics,
    pub vtuber_score: f64,
    pub vtuber_reasons: Vec<String>,
    pub language_focus: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_stage: Option<SearchStage>,
    pub discovered_at: DateTime<Utc>,
}

impl DiscoveredPerformer {
    #[must_use]
    pub fn from_candidate(
        platform: Platform,
        candidate: &Candidate,
        score: &ScoreResult,
        language_focus: String,
        stage: Option<SearchStage>,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        let username = candidate
            .login
            .clone()
            .unwrap_or_else(|| candidate.display_name.clone());
        let (url, metrics) = match platform {
            Platform::Twitch => (
                format!("https://twitch.tv/{username}"),
                AudienceMetrics::Twitch {
                    is_live: candidate.is_live,
                    broadcaster_type: candidate.broadcaster_type.clone().unwrap_or_default(),
                    viewer_count: candidate.viewer_count.unwrap_or(0),
                    stream_title: candidate.title.clone(),
                },
            ),
            Platform::YouTube => (
                format!("https://youtube.com/channel/{}", candidate.id),
                AudienceMetrics::YouTube {
                    subscriber_count: candidate.subscriber_count.unwrap_or(0),
                    video_count: candidate.video_count.unwrap_or(0),
                    view_count: candidate.view_count.unwrap_or(0),
                },
            ),
        };
        Self {
            platform,
            id: candidate.id.clone(),
            username,
            display_name: candidate.display_name.clone(),
            description: candidate.description.clone(),
            url,
            avatar_url: candidate.avatar_url.clone(),
            metrics,
            vtuber_score: score.score,
            vtuber_reasons: score.reasons.clone(),
            language_focus,
            search_stage: stage,
            discovered_at,
        }
    }
}
