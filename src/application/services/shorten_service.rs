//! URL shortening and resolution service.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::services::{KeyAssigner, KeyPolicy, Registry, Resolver};
use crate::domain::entities::{RegistryStats, Shortened, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::key_deriver::{derive_key, normalize_custom_key};
use crate::utils::url_normalizer::normalize_url;

/// Entry point for the write and read paths of the registry.
///
/// Write path: normalize → find or create → derive → assign.
/// Read path: resolve.
pub struct ShortenService {
    repository: Arc<dyn UrlRepository>,
    registry: Registry,
    assigner: KeyAssigner,
    resolver: Resolver,
}

impl ShortenService {
    /// Creates a new service.
    ///
    /// `conflict_retries` bounds how often the registry re-runs its lookup
    /// after losing an insert race.
    pub fn new(
        repository: Arc<dyn UrlRepository>,
        policy: KeyPolicy,
        conflict_retries: usize,
    ) -> Self {
        Self {
            registry: Registry::new(repository.clone(), conflict_retries),
            assigner: KeyAssigner::new(repository.clone(), policy),
            resolver: Resolver::new(repository.clone()),
            repository,
        }
    }

    pub fn policy(&self) -> KeyPolicy {
        self.assigner.policy()
    }

    /// Registers `url` (once) and returns its keys.
    ///
    /// Submitting the same URL again returns the same auto key. A pending
    /// record left behind by an interrupted earlier call is keyed here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - the URL is not an `http://` or `https://` URL
    /// - the custom key is malformed or reserved
    /// - the custom key already resolves to a different URL
    /// - the URL already has a different custom key
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn create_or_get_key(
        &self,
        url: &str,
        custom_key: Option<String>,
    ) -> Result<Shortened, AppError> {
        let normalized = normalize_url(url).map_err(|e| {
            AppError::bad_request("URL not supported", json!({ "reason": e.to_string() }))
        })?;
        let custom_key = normalize_custom_key(custom_key)?;

        if let Some(custom) = custom_key.as_deref()
            && let Some(existing) = self.resolver.find(custom).await?
            && existing != normalized
        {
            return Err(AppError::bad_request(
                "Custom key is already in use",
                json!({ "custom_key": custom }),
            ));
        }

        let id = self.registry.find_or_create(&normalized).await?;
        let auto_key = derive_key_for(id, &normalized)?;
        let record = self
            .assigner
            .assign(id, &auto_key, custom_key.as_deref())
            .await?;

        Ok(Shortened {
            id,
            url: record.url,
            auto_key,
            custom_key: record.custom_key,
        })
    }

    /// Resolves an auto or custom key to its URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key is unknown.
    /// Returns [`AppError::Storage`] on backend errors.
    pub async fn resolve_key(&self, key: &str) -> Result<String, AppError> {
        self.resolver.lookup(key).await
    }

    /// Derives and assigns keys for up to `limit` pending records.
    ///
    /// Returns the number of records that became keyed. Failures on single
    /// records are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if pending records cannot be listed.
    pub async fn repair_pending(&self, limit: i64) -> Result<usize, AppError> {
        let pending = self.repository.list_pending(limit).await?;
        let mut repaired = 0;

        for record in pending {
            match self.repair_record(&record).await {
                Ok(auto_key) => {
                    info!(id = record.id, auto_key = %auto_key, "repaired pending record");
                    repaired += 1;
                }
                Err(e) => warn!(id = record.id, error = %e, "failed to repair pending record"),
            }
        }

        Ok(repaired)
    }

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    pub async fn get_record(&self, id: i64) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("URL record not found", json!({ "id": id })))
    }

    pub async fn registry_stats(&self) -> Result<RegistryStats, AppError> {
        self.repository.stats().await
    }

    async fn repair_record(&self, record: &UrlRecord) -> Result<String, AppError> {
        let auto_key = derive_key_for(record.id, &record.url)?;
        self.assigner.assign(record.id, &auto_key, None).await?;
        Ok(auto_key)
    }
}

/// Derives the auto key of a stored record.
///
/// # Errors
///
/// Returns [`AppError::Storage`] if `id` is not a positive row id.
pub fn derive_key_for(id: i64, url: &str) -> Result<String, AppError> {
    match u64::try_from(id) {
        Ok(id) if id > 0 => Ok(derive_key(id, url)),
        _ => Err(AppError::storage(
            "Invalid record id",
            json!({ "id": id }),
        )),
    }
}
