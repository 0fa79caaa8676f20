//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::ShortenService;
use crate::config::{Config, NotFoundPolicy};

/// HTTP-facing settings fixed at startup.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Prefix of short links, always `/`-delimited (`/` or `/seg/`).
    pub base_path: String,
    /// Absolute base used by the legacy `/short` endpoint.
    pub base_url: String,
    pub not_found_policy: NotFoundPolicy,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_path: config.base_path.clone(),
            base_url: config.base_url.clone(),
            not_found_policy: config.not_found_policy,
        }
    }

    /// Site-relative URI of a short link, e.g. `/s/3nvu`.
    pub fn short_uri(&self, key: &str) -> String {
        format!("{}{}", self.base_path, key)
    }

    /// Absolute short link for the legacy endpoint.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            base_url: String::new(),
            not_found_policy: NotFoundPolicy::Redirect,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub http: Arc<HttpSettings>,
}

impl AppState {
    pub fn new(shorten_service: Arc<ShortenService>, http: HttpSettings) -> Self {
        Self {
            shorten_service,
            http: Arc::new(http),
        }
    }
}
