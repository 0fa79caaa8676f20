mod common;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;

fn form(long_url: &str) -> [(&'static str, String); 1] {
    [("longUrl", STANDARD.encode(long_url))]
}

#[tokio::test]
async fn test_short_success() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.post("/short").form(&form("https://example.com")).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["Code"], 1);
    assert_eq!(body["Message"], "");
    assert_eq!(body["LongUrl"], "https://example.com");
    assert_eq!(body["ShortUrl"], "https://s.example.com/6bx");
}

#[tokio::test]
async fn test_short_shares_keys_with_add_url() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let legacy = server
        .post("/short")
        .form(&form("https://www.rust-lang.org/"))
        .await
        .json::<Value>();
    let api = server
        .post("/api/add-url")
        .json(&serde_json::json!({ "url": "https://www.rust-lang.org/" }))
        .await
        .json::<Value>();

    assert_eq!(
        legacy["ShortUrl"],
        format!("{}/{}", common::BASE_URL, api["data"]["key"].as_str().unwrap())
    );
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_short_missing_long_url() {
    let (state, _repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.post("/short").form(&[("longUrl", "")]).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["Code"], 0);
    assert!(!body["Message"].as_str().unwrap().is_empty());
    assert!(body.get("ShortUrl").is_none());
}

#[tokio::test]
async fn test_short_invalid_base64() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server
        .post("/short")
        .form(&[("longUrl", "%%%not-base64%%%")])
        .await;

    response.assert_status_bad_request();
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_short_unsupported_url() {
    let (state, repo) = common::create_test_state();
    let server = common::create_test_server(state);

    let response = server.post("/short").form(&form("mailto:someone@example.com")).await;

    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["Code"], 0);
    assert!(repo.is_empty());
}
