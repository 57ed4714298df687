//! YouTube Data API v3 client (API key auth).

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use vtscout_core::Platform;

use super::{
    endpoint, fetch_in_batches, non_blank, parse_base_url, parse_records, read_json,
    retry_with_backoff, ClientSettings,
};
use crate::api::PlatformApi;
use crate::error::DiscoveryError;
use crate::types::{RawChannel, RawUser};

const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3/";

/// The Data API caps both `maxResults` and `id` lists at 50.
pub const YOUTUBE_BATCH_SIZE: usize = 50;

#[derive(Debug, Deserialize)]
struct ItemsEnvelope {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    high: Option<Thumbnail>,
}

impl Thumbnails {
    fn best(self) -> Option<String> {
        [self.high, self.medium, self.default]
            .into_iter()
            .flatten()
            .find_map(|t| non_blank(t.url))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: Option<String>,
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    title: String,
    #[serde(default)]
    description: String,
    custom_url: Option<String>,
    default_language: Option<String>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

/// Counts arrive as decimal strings. Unparseable or hidden means absent.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    view_count: Option<String>,
    subscriber_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
    video_count: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BrandingChannel {
    keywords: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BrandingSettings {
    #[serde(default)]
    channel: BrandingChannel,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: Statistics,
    #[serde(default)]
    branding_settings: BrandingSettings,
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Splits a channel keyword string, honouring double-quoted phrases:
/// `vtuber "virtual youtuber" anime` yields three keywords.
pub(crate) fn split_keywords(raw: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    for ch in raw.chars() {
        match ch {
            '"' => quoted = !quoted,
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    keywords.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        keywords.push(current.trim().to_string());
    }
    keywords
}

impl SearchItem {
    /// `None` when neither the id nor the snippet names a channel.
    fn into_channel(self) -> Option<RawChannel> {
        let id = non_blank(self.id.channel_id).or_else(|| non_blank(self.snippet.channel_id))?;
        Some(RawChannel {
            id,
            display_name: self.snippet.title,
            thumbnail_url: self.snippet.thumbnails.best(),
            ..RawChannel::default()
        })
    }
}

impl From<ChannelItem> for RawUser {
    fn from(item: ChannelItem) -> Self {
        let stats = item.statistics;
        let subscriber_count = if stats.hidden_subscriber_count {
            None
        } else {
            parse_count(stats.subscriber_count.as_deref())
        };
        Self {
            id: item.id,
            login: non_blank(item.snippet.custom_url),
            display_name: item.snippet.title,
            description: item.snippet.description,
            avatar_url: item.snippet.thumbnails.best(),
            broadcaster_type: None,
            language: non_blank(item.snippet.default_language),
            subscriber_count,
            view_count: parse_count(stats.view_count.as_deref()),
            video_count: parse_count(stats.video_count.as_deref()),
            tags: item
                .branding_settings
                .channel
                .keywords
                .as_deref()
                .map(split_keywords)
                .unwrap_or_default(),
        }
    }
}

/// Client for the YouTube Data API v3.
///
/// YouTube has no live-stream search by channel, so the content stage
/// relies on the default channel-search fallback.
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    api_base: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YouTubeClient {
    /// Creates a client pointed at the production Data API.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, settings: &ClientSettings) -> Result<Self, DiscoveryError> {
        Self::with_base_url(api_key, settings, DEFAULT_API_BASE)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built,
    /// or [`DiscoveryError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        settings: &ClientSettings,
        base_url: &str,
    ) -> Result<Self, DiscoveryError> {
        Ok(Self {
            http: settings.build_http()?,
            api_key: api_key.to_owned(),
            api_base: parse_base_url(base_url)?,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    async fn get_items<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, DiscoveryError> {
        let url = endpoint(&self.api_base, path)?;
        let http = &self.http;
        let url = &url;
        let api_key = self.api_key.as_str();

        let envelope: ItemsEnvelope =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
                let response = http
                    .get(url.clone())
                    .query(params)
                    .query(&[("key", api_key)])
                    .send()
                    .await?;
                read_json(Platform::YouTube, path, response).await
            })
            .await?;

        Ok(parse_records(Platform::YouTube, path, envelope.items))
    }
}

#[async_trait]
impl PlatformApi for YouTubeClient {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    async fn search_channels(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawChannel>, DiscoveryError> {
        let params = [
            ("part", "snippet".to_string()),
            ("q", query.to_string()),
            ("type", "channel".to_string()),
            (
                "maxResults",
                max_results.clamp(1, YOUTUBE_BATCH_SIZE).to_string(),
            ),
            ("order", "relevance".to_string()),
        ];
        let items: Vec<SearchItem> = self.get_items("search", &params).await?;
        let channels: Vec<RawChannel> = items
            .into_iter()
            .filter_map(SearchItem::into_channel)
            .collect();
        tracing::debug!(query, hits = channels.len(), "YouTube channel search");
        Ok(channels)
    }

    async fn get_user_info(&self, ids: &[String]) -> Result<Vec<RawUser>, DiscoveryError> {
        let items: Vec<ChannelItem> =
            fetch_in_batches(ids, YOUTUBE_BATCH_SIZE, move |chunk| async move {
                let params = [
                    ("part", "snippet,statistics,brandingSettings".to_string()),
                    ("id", chunk.join(",")),
                    ("maxResults", YOUTUBE_BATCH_SIZE.to_string()),
                ];
                self.get_items("channels", &params).await
            })
            .await?;
        Ok(items.into_iter().map(RawUser::from).collect())
    }
}
