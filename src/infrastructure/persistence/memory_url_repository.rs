//! In-process implementation of the URL repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{RegistryStats, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::{
    AUTO_KEY_UNIQUE_CONSTRAINT, AppError, CUSTOM_KEY_UNIQUE_CONSTRAINT, URL_UNIQUE_CONSTRAINT,
};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    records: BTreeMap<i64, UrlRecord>,
}

/// Mutex-guarded registry mirroring the constraints of the `urls` table.
///
/// Each call takes the lock once, so `find_id_by_url` followed by `insert`
/// is exactly as racy as it is against PostgreSQL: the loser of a race gets
/// [`AppError::Conflict`].
#[derive(Debug, Default)]
pub struct MemoryUrlRepository {
    state: Mutex<State>,
}

impl MemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record as-is, bypassing key assignment.
    ///
    /// Lets tests stage pending records and inconsistent key layouts.
    pub fn seed(&self, record: UrlRecord) {
        let mut state = self.lock();
        state.next_id = state.next_id.max(record.id);
        state.records.insert(record.id, record);
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records holding `url`.
    pub fn count_url(&self, url: &str) -> usize {
        self.lock()
            .records
            .values()
            .filter(|record| record.url == url)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn find_id_by_url(&self, url: &str) -> Result<Option<i64>, AppError> {
        Ok(self
            .lock()
            .records
            .values()
            .find(|record| record.url == url)
            .map(|record| record.id))
    }

    async fn insert(&self, url: &str) -> Result<i64, AppError> {
        let mut state = self.lock();

        if state.records.values().any(|record| record.url == url) {
            return Err(AppError::from_unique_violation(Some(URL_UNIQUE_CONSTRAINT)));
        }

        state.next_id += 1;
        let id = state.next_id;
        state
            .records
            .insert(id, UrlRecord::pending(id, url.to_string(), Utc::now()));

        Ok(id)
    }

    async fn assign_keys(
        &self,
        id: i64,
        auto_key: &str,
        custom_key: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let mut state = self.lock();

        let current = state
            .records
            .get(&id)
            .ok_or_else(|| AppError::not_found("URL record not found", json!({ "id": id })))?;
        let next_custom = current.custom_key.clone().or(custom_key);

        let auto_taken = state
            .records
            .values()
            .any(|record| record.id != id && record.auto_key.as_deref() == Some(auto_key));
        if auto_taken {
            return Err(AppError::from_unique_violation(Some(AUTO_KEY_UNIQUE_CONSTRAINT)));
        }

        if let Some(custom) = next_custom.as_deref() {
            let custom_taken = state
                .records
                .values()
                .any(|record| record.id != id && record.custom_key.as_deref() == Some(custom));
            if custom_taken {
                return Err(AppError::from_unique_violation(Some(
                    CUSTOM_KEY_UNIQUE_CONSTRAINT,
                )));
            }
        }

        let record = state
            .records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("URL record not found", json!({ "id": id })))?;
        record.auto_key = Some(auto_key.to_string());
        record.custom_key = next_custom;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn find_url_by_key(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .lock()
            .records
            .values()
            .rev()
            .find(|record| record.matches_key(key))
            .map(|record| record.url.clone()))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.lock().records.get(&id).cloned())
    }

    async fn list_pending(&self, limit: i64) -> Result<Vec<UrlRecord>, AppError> {
        let limit = usize::try_from(limit).unwrap_or(0);

        Ok(self
            .lock()
            .records
            .values()
            .filter(|record| record.auto_key.is_none())
            .take(limit)
            .cloned()
            .collect())
    }

    async fn stats(&self) -> Result<RegistryStats, AppError> {
        let state = self.lock();
        let total = state.records.len() as i64;
        let pending = state
            .records
            .values()
            .filter(|record| record.auto_key.is_none())
            .count() as i64;

        Ok(RegistryStats { total, pending })
    }
}
