//! Binding of derived and custom keys onto registry records.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Custom key behavior selected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPolicy {
    /// When no custom key is supplied, store the auto key as the custom key.
    pub default_custom_key_to_auto: bool,
}

impl Default for KeyPolicy {
    fn default() -> Self {
        Self {
            default_custom_key_to_auto: true,
        }
    }
}

/// Writes keys onto records created by the registry.
///
/// This is the second half of a two-phase write: the key depends on the id
/// assigned at creation, so it cannot be part of the insert. Calls are
/// idempotent; re-running with the same inputs leaves the record unchanged.
pub struct KeyAssigner {
    repository: Arc<dyn UrlRepository>,
    policy: KeyPolicy,
}

impl KeyAssigner {
    pub fn new(repository: Arc<dyn UrlRepository>, policy: KeyPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.policy
    }

    /// Sets `auto_key` and, when the record has none, `custom_key`.
    ///
    /// Without a caller-supplied custom key the custom key defaults to the
    /// derived key if the policy says so, otherwise it is left unset. A
    /// defaulted custom key that another record already uses is dropped and
    /// the record is keyed with its auto key only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the record already carries a
    /// different custom key than the one requested, or if the requested key
    /// belongs to another record.
    /// Returns [`AppError::NotFound`] if the record does not exist.
    pub async fn assign(
        &self,
        id: i64,
        derived_key: &str,
        custom_key: Option<&str>,
    ) -> Result<UrlRecord, AppError> {
        let record = match custom_key {
            Some(key) => {
                self.repository
                    .assign_keys(id, derived_key, Some(key.to_string()))
                    .await?
            }
            None if self.policy.default_custom_key_to_auto => {
                match self
                    .repository
                    .assign_keys(id, derived_key, Some(derived_key.to_string()))
                    .await
                {
                    // Another record already uses the auto key as its alias.
                    Err(AppError::Validation { .. }) => {
                        warn!(
                            id,
                            auto_key = derived_key,
                            "auto key taken as custom key, leaving custom key unset"
                        );
                        self.repository.assign_keys(id, derived_key, None).await?
                    }
                    result => result?,
                }
            }
            None => self.repository.assign_keys(id, derived_key, None).await?,
        };

        if let Some(requested) = custom_key
            && record.custom_key.as_deref() != Some(requested)
        {
            return Err(AppError::bad_request(
                "URL already has a different custom key",
                json!({ "custom_key": record.custom_key, "requested": requested }),
            ));
        }

        debug!(id, auto_key = derived_key, custom_key = ?record.custom_key, "keys assigned");
        Ok(record)
    }
}
