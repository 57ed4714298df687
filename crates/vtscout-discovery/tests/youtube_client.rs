//! Integration tests for `YouTubeClient` using wiremock HTTP mocks.

use vtscout_discovery::{ClientSettings, DiscoveryError, PlatformApi, YouTubeClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> YouTubeClient {
    let settings = ClientSettings {
        timeout_secs: 5,
        max_retries: 0,
        backoff_base_ms: 0,
        ..ClientSettings::default()
    };
    YouTubeClient::with_base_url("test-key", &settings, base_url)
        .expect("client construction should not fail")
}

fn search_body() -> serde_json::Value {
    serde_json::json!({
        "kind": "youtube#searchListResponse",
        "items": [
            {
                "kind": "youtube#searchResult",
                "id": { "kind": "youtube#channel", "channelId": "UC1" },
                "snippet": {
                    "channelId": "UC1",
                    "title": "Mia Streams",
                    "description": "virtual youtuber",
                    "thumbnails": { "default": { "url": "https://yt3.ggpht.com/mia.jpg" } }
                }
            },
            {
                "kind": "youtube#searchResult",
                "id": { "kind": "youtube#channel" },
                "snippet": { "title": "no channel id" }
            }
        ]
    })
}

#[tokio::test]
async fn search_channels_sends_key_and_clamps_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("key", "test-key"))
        .and(query_param("type", "channel"))
        .and(query_param("q", "Mia"))
        .and(query_param("maxResults", "50"))
        .and(query_param("part", "snippet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let channels = client.search_channels("Mia", 100).await.expect("search");

    assert_eq!(channels.len(), 1);
    assert_eq!(channels[0].id, "UC1");
    assert_eq!(channels[0].display_name, "Mia Streams");
    assert_eq!(
        channels[0].thumbnail_url.as_deref(),
        Some("https://yt3.ggpht.com/mia.jpg")
    );
}

#[tokio::test]
async fn channel_details_parse_statistics_and_keywords() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("id", "UC1,UC2"))
        .and(query_param("part", "snippet,statistics,brandingSettings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": "UC1",
                "snippet": {
                    "title": "Mia Streams",
                    "description": "Live2D vtuber singing every friday",
                    "customUrl": "@miastreams",
                    "thumbnails": { "high": { "url": "https://yt3.ggpht.com/mia-hi.jpg" } }
                },
                "statistics": {
                    "viewCount": "120000",
                    "subscriberCount": "4500",
                    "hiddenSubscriberCount": false,
                    "videoCount": "87"
                },
                "brandingSettings": {
                    "channel": { "keywords": "vtuber \"virtual youtuber\" karaoke" }
                }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let users = client
        .get_user_info(&["UC1".to_owned(), "UC2".to_owned()])
        .await
        .expect("details");

    assert_eq!(users.len(), 1);
    let mia = &users[0];
    assert_eq!(mia.login.as_deref(), Some("@miastreams"));
    assert_eq!(mia.subscriber_count, Some(4_500));
    assert_eq!(mia.view_count, Some(120_000));
    assert_eq!(mia.video_count, Some(87));
    assert_eq!(mia.tags, vec!["vtuber", "virtual youtuber", "karaoke"]);
    assert_eq!(
        mia.avatar_url.as_deref(),
        Some("https://yt3.ggpht.com/mia-hi.jpg")
    );
}

#[tokio::test]
async fn detail_lookup_is_batched_by_fifty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .expect(3)
        .mount(&server)
        .await;

    let ids: Vec<String> = (0..120).map(|i| format!("UC{i}")).collect();
    let client = test_client(&server.uri());
    let users = client.get_user_info(&ids).await.expect("details");
    assert!(users.is_empty());
}

#[tokio::test]
async fn invalid_key_is_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "errors": [{ "reason": "keyInvalid", "domain": "global" }]
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_channels("Mia", 10).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Auth { .. }), "got {err:?}");
}

#[tokio::test]
async fn quota_exhaustion_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "errors": [{ "reason": "quotaExceeded" }] }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_channels("Mia", 10).await.unwrap_err();
    assert!(
        matches!(err, DiscoveryError::UnexpectedStatus { status: 403, .. }),
        "got {err:?}"
    );
    assert!(!err.is_auth_failure());
}

#[tokio::test]
async fn live_search_falls_back_to_channel_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let streams = client.search_live_streams("Mia", 50).await.expect("fallback");

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].user_id, "UC1");
    assert_eq!(streams[0].user_name, "Mia Streams");
    assert!(!streams[0].is_live);
}
