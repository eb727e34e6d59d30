mod common;

use axum::http::StatusCode;
use redis_url_shortener::api::dto::shorten::ShortenResponse;
use redis_url_shortener::domain::repositories::KeyValueStore;
use redis_url_shortener::infrastructure::store::MemoryStore;
use redis_url_shortener::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_redirect_created_link() {
    let (state, _links, _quotas) = common::create_test_state(&common::test_config());
    let server = common::test_server(state);

    let created: ShortenResponse = server
        .post("/api/v1/shortener")
        .json(&json!({ "url": "https://www.rust-lang.org/learn" }))
        .await
        .json();

    let response = server.get(&format!("/{}", created.custom_short)).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header("location"),
        "https://www.rust-lang.org/learn"
    );
}

#[tokio::test]
async fn test_redirect_scheme_less_target() {
    let (state, _links, _quotas) = common::create_test_state(&common::test_config());
    let server = common::test_server(state);

    server
        .post("/api/v1/shortener")
        .json(&json!({ "url": "example.com/page", "customShort": "page" }))
        .await
        .assert_status_ok();

    let response = server.get("/page").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "http://example.com/page");
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let (state, links, _quotas) = common::create_test_state(&common::test_config());
    let server = common::test_server(state);

    let response = server.get("/nope42").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"], "short url not found");
    assert!(links.get("counter").await.unwrap().is_none());
}

#[tokio::test]
async fn test_redirect_counts_hits() {
    let (state, links, _quotas) = common::create_test_state(&common::test_config());
    links
        .set_ex("abc123", "http://example.com", Duration::from_secs(3600))
        .await
        .unwrap();
    let server = common::test_server(state);

    for _ in 0..3 {
        server
            .get("/abc123")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    assert_eq!(links.get("counter").await.unwrap().as_deref(), Some("3"));
}

#[tokio::test]
async fn test_redirect_is_unmetered() {
    let mut config = common::test_config();
    config.api_quota = 0;
    let (state, links, quotas) = common::create_test_state(&config);
    links
        .set_ex("free", "http://example.com", Duration::from_secs(3600))
        .await
        .unwrap();
    let server = common::test_server(state);

    for _ in 0..20 {
        server
            .get("/free")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
    }

    assert!(quotas.is_empty());
}

#[tokio::test]
async fn test_counter_key_does_not_redirect() {
    let (state, links, _quotas) = common::create_test_state(&common::test_config());
    links
        .set_ex("abc123", "http://example.com", Duration::from_secs(3600))
        .await
        .unwrap();
    let server = common::test_server(state);

    server.get("/abc123").await;

    server.get("/counter").await.assert_status_not_found();
}

#[tokio::test]
async fn test_redirect_non_ascii_target() {
    let (state, links, _quotas) = common::create_test_state(&common::test_config());
    links
        .set_ex("cafe", "http://example.com/café", Duration::from_secs(3600))
        .await
        .unwrap();
    let server = common::test_server(state);

    let response = server.get("/cafe").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "http://example.com/caf%C3%A9");
}

#[tokio::test]
async fn test_redirect_store_failure() {
    let config = common::test_config();
    let state = AppState::new(
        &config,
        Arc::new(common::FailingStore),
        Arc::new(MemoryStore::new()),
    );
    let server = common::test_server(state);

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "unable to process request");
}

#[tokio::test(start_paused = true)]
async fn test_slow_store_hits_deadline() {
    let mut config = common::test_config();
    config.request_timeout_secs = 1;
    let state = AppState::new(
        &config,
        Arc::new(common::SlowStore::new(Duration::from_secs(5))),
        Arc::new(MemoryStore::new()),
    );
    let server = common::test_server(state);

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body["error"], "request deadline exceeded");
}
