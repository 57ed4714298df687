//! Integration tests for `TwitchClient` using wiremock HTTP mocks.

use vtscout_core::TwitchCredentials;
use vtscout_discovery::{ClientSettings, DiscoveryError, PlatformApi, TwitchClient};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(max_retries: u32) -> ClientSettings {
    ClientSettings {
        timeout_secs: 5,
        max_retries,
        backoff_base_ms: 0,
        ..ClientSettings::default()
    }
}

fn test_client(server: &MockServer, max_retries: u32) -> TwitchClient {
    let credentials = TwitchCredentials {
        client_id: "cid".to_owned(),
        client_secret: "secret".to_owned(),
    };
    TwitchClient::with_base_urls(credentials, &settings(max_retries), &server.uri(), &server.uri())
        .expect("client construction should not fail")
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=cid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "tok",
            "expires_in": 5_000_000,
            "token_type": "bearer"
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn channel_json(id: &str, name: &str, live: bool) -> serde_json::Value {
    serde_json::json!({
        "broadcaster_language": "en",
        "broadcaster_login": name.to_lowercase(),
        "display_name": name,
        "game_id": "509658",
        "game_name": "Just Chatting",
        "id": id,
        "is_live": live,
        "tag_ids": [],
        "tags": ["VTuber", "English"],
        "thumbnail_url": format!("https://static-cdn.jtvnw.net/{id}.png"),
        "title": "cozy karaoke",
        "started_at": if live { "2026-03-01T18:00:00Z" } else { "" }
    })
}

#[tokio::test]
async fn search_channels_parses_hits_and_reuses_token() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/search/channels"))
        .and(query_param("query", "Kuro"))
        .and(query_param("first", "100"))
        .and(header("Client-Id", "cid"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [channel_json("1", "Kuro_VT", true), channel_json("2", "KuroFan", false)]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let first = client.search_channels("Kuro", 500).await.expect("search");
    let second = client.search_channels("Kuro", 500).await.expect("search");

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].id, "1");
    assert_eq!(first[0].login.as_deref(), Some("kuro_vt"));
    assert!(first[0].is_live);
    assert!(first[0].started_at.is_some());
    assert_eq!(first[0].tags, vec!["VTuber", "English"]);
    assert!(first[1].started_at.is_none());
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": 400,
            "message": "invalid client secret"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let err = client.search_channels("Kuro", 10).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Auth { .. }), "got {err:?}");
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn user_lookup_is_batched_by_hundred() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("id", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "0",
                "login": "kuro_vt",
                "display_name": "Kuro_VT",
                "type": "",
                "broadcaster_type": "affiliate",
                "description": "virtual idol from the moon",
                "profile_image_url": "https://static-cdn.jtvnw.net/kuro.png",
                "offline_image_url": "",
                "view_count": 0,
                "created_at": "2020-01-01T00:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("id", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let ids: Vec<String> = (0..150).map(|i| i.to_string()).collect();
    let client = test_client(&server, 0);
    let users = client.get_user_info(&ids).await.expect("users");

    assert_eq!(users.len(), 1);
    assert_eq!(users[0].broadcaster_type.as_deref(), Some("affiliate"));
    assert_eq!(users[0].description, "virtual idol from the moon");
}

#[tokio::test]
async fn live_search_enriches_with_stream_details() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/search/channels"))
        .and(query_param("live_only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [channel_json("1", "Kuro_VT", true)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/streams"))
        .and(query_param("user_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "id": "s1",
                "user_id": "1",
                "user_login": "kuro_vt",
                "user_name": "Kuro_VT",
                "type": "live",
                "title": "live2d model reveal!",
                "viewer_count": 321,
                "started_at": "2026-03-02T20:00:00Z",
                "language": "en",
                "tags": ["VTuber"]
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let streams = client.search_live_streams("Kuro", 50).await.expect("live");

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].user_id, "1");
    assert_eq!(streams[0].viewer_count, Some(321));
    assert_eq!(streams[0].title, "live2d model reveal!");
    assert!(streams[0].is_live);
}

#[tokio::test]
async fn channel_tags_are_keyed_by_broadcaster() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("broadcaster_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [
                { "broadcaster_id": "1", "broadcaster_name": "Kuro_VT", "tags": ["ENVTuber"] },
                { "broadcaster_name": "missing id" }
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let tags = client
        .get_channel_tags(&["1".to_owned()])
        .await
        .expect("tags");

    assert_eq!(tags.len(), 1);
    assert_eq!(tags["1"], vec!["ENVTuber"]);
}

#[tokio::test]
async fn rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/search/channels"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let err = client.search_channels("Kuro", 10).await.unwrap_err();
    assert!(
        matches!(err, DiscoveryError::RateLimited { retry_after_secs: 0, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/search/channels"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [channel_json("1", "Kuro_VT", false)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 1);
    let channels = client.search_channels("Kuro", 10).await.expect("retried");
    assert_eq!(channels.len(), 1);
}

#[tokio::test]
async fn server_error_without_retries_is_unexpected_status() {
    let server = MockServer::start().await;
    mount_token(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let err = client.get_user_info(&["1".to_owned()]).await.unwrap_err();
    assert!(
        matches!(err, DiscoveryError::UnexpectedStatus { status: 500, .. }),
        "got {err:?}"
    );
    assert!(!err.is_auth_failure());
}
