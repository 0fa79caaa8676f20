//! DTOs for the add-url endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to register a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct AddUrlRequest {
    /// Long URL; must start with `http://` or `https://`. The byte limit
    /// applies after trimming and is checked by the normalizer.
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    /// Optional alias resolved alongside the derived key.
    #[validate(length(max = 64, message = "Custom key is too long"))]
    pub custom_key: Option<String>,
}

/// Envelope shared by JSON API responses.
#[derive(Debug, Serialize)]
pub struct ApiResult<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: String::new(),
            data,
        }
    }
}

/// Keys assigned to a registered URL.
#[derive(Debug, Serialize)]
pub struct AddUrlData {
    /// Site-relative short link (`base_path` + key).
    pub uri: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_key: Option<String>,
}
