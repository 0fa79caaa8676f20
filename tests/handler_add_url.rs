mod common;

use serde_json::{Value, json};
use shorten::application::services::KeyPolicy;
use shorten::config::NotFoundPolicy;
use shorten::infrastructure::persistence::MemoryUrlRepository;
use std::sync::Arc;

#[tokio::test]
async fn test_add_url_success() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["code"], 0);
    assert_eq!(body["message"], "");
    assert_eq!(body["data"]["uri"], "/6bx");
    assert_eq!(body["data"]["key"], "6bx");
    assert_eq!(body["data"]["custom_key"], "6bx");
}

#[tokio::test]
async fn test_add_url_length_limit_applies_after_trimming() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);
    let url = format!("https://example.com/{}", "a".repeat(4076));

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": format!("  {url}\n") }))
        .await;
    response.assert_status_ok();

    // 4076 characters but 8132 bytes.
    let multibyte = format!("https://example.com/{}", "é".repeat(4056));
    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": multibyte }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "URL not supported"
    );
}

#[tokio::test]
async fn test_add_url_is_idempotent() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let first = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://www.rust-lang.org/" }))
        .await
        .json::<Value>();
    let second = server
        .post("/api/add-url")
        .json(&json!({ "url": " https://www.rust-lang.org/ " }))
        .await
        .json::<Value>();

    assert_eq!(first["data"]["key"], second["data"]["key"]);
    assert_eq!(repo.count_url("https://www.rust-lang.org/"), 1);
}

#[tokio::test]
async fn test_add_url_with_custom_key() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://example.com", "custom_key": "promo" }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["data"]["key"], "6bx");
    assert_eq!(body["data"]["custom_key"], "promo");

    let redirect = server.get("/promo").await;
    assert_eq!(redirect.status_code(), 301);
    assert_eq!(redirect.header("location"), "https://example.com");
}

#[tokio::test]
async fn test_add_url_uses_base_path() {
    let repo = Arc::new(MemoryUrlRepository::new());
    let state = common::create_state_with(
        repo,
        KeyPolicy::default(),
        common::http_settings("/s/", NotFoundPolicy::Redirect),
    );
    let server = common::create_test_server(state);

    let body = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json::<Value>();

    assert_eq!(body["data"]["uri"], "/s/6bx");
}

#[tokio::test]
async fn test_add_url_policy_off_omits_custom_key() {
    let repo = Arc::new(MemoryUrlRepository::new());
    let state = common::create_state_with(
        repo,
        KeyPolicy {
            default_custom_key_to_auto: false,
        },
        common::http_settings("/", NotFoundPolicy::Redirect),
    );
    let server = common::create_test_server(state);

    let body = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json::<Value>();

    assert_eq!(body["data"]["key"], "6bx");
    assert!(body["data"].get("custom_key").is_none());
}

#[tokio::test]
async fn test_add_url_rejects_unsupported_scheme() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": "ftp://example.com" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "validation_error");
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_add_url_rejects_empty_url() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": "" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_add_url_rejects_reserved_custom_key() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://example.com", "custom_key": "health" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_add_url_custom_key_taken() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    server
        .post("/api/add-url")
        .json(&json!({ "url": "https://first.example", "custom_key": "promo" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/add-url")
        .json(&json!({ "url": "https://second.example", "custom_key": "promo" }))
        .await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["error"]["message"], "Custom key is already in use");
    assert_eq!(repo.count_url("https://second.example"), 0);
}
