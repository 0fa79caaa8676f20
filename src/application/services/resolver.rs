//! Key to URL resolution.

use serde_json::json;
use std::sync::Arc;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::key_deriver::MAX_KEY_LENGTH;

/// Resolves auto keys and custom keys back to URLs.
///
/// Both key columns are searched. Uniqueness constraints make a second match
/// unlikely, but a custom key may equal another record's auto key; the most
/// recently created record (highest id) wins.
pub struct Resolver {
    repository: Arc<dyn UrlRepository>,
}

impl Resolver {
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self { repository }
    }

    /// Looks up the URL for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches either key column.
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn lookup(&self, key: &str) -> Result<String, AppError> {
        self.find(key).await?.ok_or_else(|| {
            AppError::not_found("Short key not found", json!({ "key": key }))
        })
    }

    /// Like [`Self::lookup`], with absence reported as `None`.
    ///
    /// Keys that could never have been stored are answered without a query.
    pub async fn find(&self, key: &str) -> Result<Option<String>, AppError> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Ok(None);
        }

        self.repository.find_url_by_key(key).await
    }
}
