//! DTOs for the legacy `/short` endpoint.
//!
//! Field names are PascalCase on the wire to stay compatible with existing
//! clients of this endpoint.

use serde::{Deserialize, Serialize};

/// Form body: `longUrl` carries the long URL in standard base64.
#[derive(Debug, Deserialize)]
pub struct ShortForm {
    #[serde(rename = "longUrl", default)]
    pub long_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShortResponse {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

impl ShortResponse {
    pub fn success(long_url: String, short_url: String) -> Self {
        Self {
            code: 1,
            message: String::new(),
            long_url: Some(long_url),
            short_url: Some(short_url),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
            long_url: None,
            short_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(ShortResponse::success(
            "https://example.com".to_string(),
            "https://s.example.com/6bx".to_string(),
        ))
        .unwrap();

        assert_eq!(json["Code"], 1);
        assert_eq!(json["Message"], "");
        assert_eq!(json["LongUrl"], "https://example.com");
        assert_eq!(json["ShortUrl"], "https://s.example.com/6bx");
    }

    #[test]
    fn test_failure_omits_urls() {
        let json = serde_json::to_value(ShortResponse::failure("pls enter long url")).unwrap();

        assert_eq!(json, serde_json::json!({ "Code": 0, "Message": "pls enter long url" }));
    }
}
