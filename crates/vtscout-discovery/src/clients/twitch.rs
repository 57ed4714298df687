//! Twitch Helix client (app access token via client credentials).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::OnceCell;
use vtscout_core::{Platform, TwitchCredentials};

use super::{
    endpoint, fetch_in_batches, non_blank, parse_base_url, parse_records, read_json,
    retry_with_backoff, ClientSettings,
};
use crate::api::PlatformApi;
use crate::error::DiscoveryError;
use crate::types::{RawChannel, RawStream, RawUser};

const DEFAULT_API_BASE: &str = "https://api.twitch.tv/helix/";
const DEFAULT_AUTH_BASE: &str = "https://id.twitch.tv/";

/// Helix accepts at most this many ids per lookup and results per search.
pub const TWITCH_BATCH_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct HelixEnvelope {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct HelixChannel {
    id: String,
    broadcaster_login: Option<String>,
    display_name: String,
    title: Option<String>,
    #[serde(default)]
    is_live: bool,
    broadcaster_language: Option<String>,
    tags: Option<Vec<String>>,
    thumbnail_url: Option<String>,
    started_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelixUser {
    id: String,
    login: Option<String>,
    display_name: String,
    description: Option<String>,
    profile_image_url: Option<String>,
    broadcaster_type: Option<String>,
    view_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct HelixStream {
    user_id: String,
    title: Option<String>,
    viewer_count: Option<u64>,
    tags: Option<Vec<String>>,
    started_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HelixChannelInfo {
    broadcaster_id: String,
    tags: Option<Vec<String>>,
}

/// Helix reports offline channels with an empty `started_at`.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<HelixChannel> for RawChannel {
    fn from(channel: HelixChannel) -> Self {
        Self {
            started_at: parse_timestamp(channel.started_at.as_deref()),
            id: channel.id,
            login: non_blank(channel.broadcaster_login),
            display_name: channel.display_name,
            title: non_blank(channel.title),
            is_live: channel.is_live,
            language: non_blank(channel.broadcaster_language),
            tags: channel.tags.unwrap_or_default(),
            thumbnail_url: non_blank(channel.thumbnail_url),
        }
    }
}

impl From<HelixUser> for RawUser {
    fn from(user: HelixUser) -> Self {
        Self {
            id: user.id,
            login: non_blank(user.login),
            display_name: user.display_name,
            description: user.description.unwrap_or_default(),
            avatar_url: non_blank(user.profile_image_url),
            broadcaster_type: non_blank(user.broadcaster_type),
            view_count: user.view_count,
            ..RawUser::default()
        }
    }
}

/// Client for the Twitch Helix API.
///
/// The app access token is fetched on first use and then reused for the
/// lifetime of the client. There is no refresh: a revoked token surfaces as
/// [`DiscoveryError::Auth`].
pub struct TwitchClient {
    http: Client,
    credentials: TwitchCredentials,
    api_base: Url,
    auth_base: Url,
    token: OnceCell<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TwitchClient {
    /// Creates a client pointed at the production Helix and OAuth hosts.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built.
    pub fn new(
        credentials: TwitchCredentials,
        settings: &ClientSettings,
    ) -> Result<Self, DiscoveryError> {
        Self::with_base_urls(credentials, settings, DEFAULT_API_BASE, DEFAULT_AUTH_BASE)
    }

    /// Creates a client with custom hosts (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Http`] if the HTTP client cannot be built,
    /// or [`DiscoveryError::InvalidBaseUrl`] if either URL does not parse.
    pub fn with_base_urls(
        credentials: TwitchCredentials,
        settings: &ClientSettings,
        api_base: &str,
        auth_base: &str,
    ) -> Result<Self, DiscoveryError> {
        Ok(Self {
            http: settings.build_http()?,
            credentials,
            api_base: parse_base_url(api_base)?,
            auth_base: parse_base_url(auth_base)?,
            token: OnceCell::new(),
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    async fn access_token(&self) -> Result<&str, DiscoveryError> {
        self.token
            .get_or_try_init(|| self.fetch_token())
            .await
            .map(String::as_str)
    }

    async fn fetch_token(&self) -> Result<String, DiscoveryError> {
        let url = endpoint(&self.auth_base, "oauth2/token")?;
        let http = &self.http;
        let url = &url;
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];
        let form = &form;

        let response =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
                let response = http.post(url.clone()).form(form).send().await?;
                match response.status() {
                    status if status.is_server_error() => {
                        Err(DiscoveryError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: url.to_string(),
                        })
                    }
                    _ => Ok(response),
                }
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = if status == StatusCode::TOO_MANY_REQUESTS {
                "token endpoint rate limited".to_string()
            } else {
                format!("token request returned {status}")
            };
            return Err(DiscoveryError::Auth {
                platform: Platform::Twitch,
                reason,
            });
        }

        let token: TokenResponse = read_json(Platform::Twitch, "oauth2/token", response).await?;
        tracing::debug!("obtained Twitch app access token");
        Ok(token.access_token)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, DiscoveryError> {
        let token = self.access_token().await?;
        let url = endpoint(&self.api_base, path)?;
        let http = &self.http;
        let url = &url;
        let client_id = self.credentials.client_id.as_str();

        let envelope: HelixEnvelope =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, move || async move {
                let response = http
                    .get(url.clone())
                    .query(params)
                    .header("Client-Id", client_id)
                    .bearer_auth(token)
                    .send()
                    .await?;
                read_json(Platform::Twitch, path, response).await
            })
            .await?;

        Ok(parse_records(Platform::Twitch, path, envelope.data))
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
        live_only: bool,
    ) -> Result<Vec<RawChannel>, DiscoveryError> {
        let mut params = vec![
            ("query", query.to_string()),
            ("first", max_results.clamp(1, TWITCH_BATCH_SIZE).to_string()),
        ];
        if live_only {
            params.push(("live_only", "true".to_string()));
        }
        let channels: Vec<HelixChannel> = self.get_data("search/channels", &params).await?;
        tracing::debug!(query, live_only, hits = channels.len(), "Twitch channel search");
        Ok(channels.into_iter().map(RawChannel::from).collect())
    }

    async fn get_streams(&self, user_ids: &[String]) -> Result<Vec<HelixStream>, DiscoveryError> {
        fetch_in_batches(user_ids, TWITCH_BATCH_SIZE, move |chunk| async move {
            let mut params: Vec<(&str, String)> =
                chunk.into_iter().map(|id| ("user_id", id)).collect();
            params.push(("first", TWITCH_BATCH_SIZE.to_string()));
            self.get_data("streams", &params).await
        })
        .await
    }
}

#[async_trait]
impl PlatformApi for TwitchClient {
    fn platform(&self) -> Platform {
        Platform::Twitch
    }

    async fn search_channels(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawChannel>, DiscoveryError> {
        self.search(query, max_results, false).await
    }

    async fn get_user_info(&self, ids: &[String]) -> Result<Vec<RawUser>, DiscoveryError> {
        let users: Vec<HelixUser> =
            fetch_in_batches(ids, TWITCH_BATCH_SIZE, move |chunk| async move {
                let params: Vec<(&str, String)> =
                    chunk.into_iter().map(|id| ("id", id)).collect();
                self.get_data("users", &params).await
            })
            .await?;
        Ok(users.into_iter().map(RawUser::from).collect())
    }

    /// Live channel search enriched with `/streams` viewer counts and titles.
    async fn search_live_streams(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<RawStream>, DiscoveryError> {
        let channels = self.search(query, max_results, true).await?;
        if channels.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = channels.iter().map(|c| c.id.clone()).collect();
        let mut streams: HashMap<String, HelixStream> = self
            .get_streams(&ids)
            .await?
            .into_iter()
            .map(|s| (s.user_id.clone(), s))
            .collect();

        Ok(channels
            .into_iter()
            .map(|channel| {
                let live = streams.remove(&channel.id);
                let mut stream = RawStream::from(channel);
                if let Some(live) = live {
                    stream.is_live = true;
                    stream.viewer_count = live.viewer_count;
                    if let Some(title) = non_blank(live.title) {
                        stream.title = title;
                    }
                    if let Some(tags) = live.tags.filter(|t| !t.is_empty()) {
                        stream.tags = tags;
                    }
                    stream.started_at =
                        parse_timestamp(live.started_at.as_deref()).or(stream.started_at);
                }
                stream
            })
            .collect())
    }

    async fn get_channel_tags(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, DiscoveryError> {
        let infos: Vec<HelixChannelInfo> =
            fetch_in_batches(ids, TWITCH_BATCH_SIZE, move |chunk| async move {
                let params: Vec<(&str, String)> =
                    chunk.into_iter().map(|id| ("broadcaster_id", id)).collect();
                self.get_data("channels", &params).await
            })
            .await?;
        Ok(infos
            .into_iter()
            .map(|info| (info.broadcaster_id, info.tags.unwrap_or_default()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_started_at_is_absent() {
        assert!(parse_timestamp(Some("")).is_none());
        assert!(parse_timestamp(None).is_none());
        let parsed = parse_timestamp(Some("2026-03-01T18:00:00Z")).unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T18:00:00+00:00");
    }

    #[test]
    fn helix_channel_blank_fields_become_none() {
        let channel: HelixChannel = serde_json::from_value(serde_json::json!({
            "id": "7",
            "broadcaster_login": "kuro_vt",
            "display_name": "Kuro_VT",
            "title": "",
            "is_live": false,
            "broadcaster_language": "",
            "tags": null,
            "thumbnail_url": "https://static-cdn.jtvnw.net/kuro.png",
            "started_at": ""
        }))
        .unwrap();
        let raw = RawChannel::from(channel);
        assert!(raw.title.is_none());
        assert!(raw.language.is_none());
        assert!(raw.tags.is_empty());
        assert!(raw.started_at.is_none());
    }
}
