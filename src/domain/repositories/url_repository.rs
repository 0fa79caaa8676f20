//! Repository trait for the URL registry.

use crate::domain::entities::{RegistryStats, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract of the URL registry.
///
/// The store is the only synchronization point: implementations must enforce
/// uniqueness of `url`, `auto_key` and `custom_key` and report violations
/// through [`AppError::from_unique_violation`] semantics.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds the id of the record holding `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn find_id_by_url(&self, url: &str) -> Result<Option<i64>, AppError>;

    /// Inserts a new pending record and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if another record already holds `url`.
    /// Returns [`AppError::Storage`] on backend errors.
    async fn insert(&self, url: &str) -> Result<i64, AppError>;

    /// Writes `auto_key` and, if the record has none yet, `custom_key`.
    ///
    /// Passing `None` as `custom_key` leaves the column untouched. An existing
    /// custom key is never overwritten; the returned record shows what is
    /// actually stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has `id`.
    /// Returns [`AppError::Validation`] if `custom_key` belongs to another record.
    /// Returns [`AppError::Storage`] on backend errors.
    async fn assign_keys(
        &self,
        id: i64,
        auto_key: &str,
        custom_key: Option<String>,
    ) -> Result<UrlRecord, AppError>;

    /// Finds the URL whose auto key or custom key equals `key`.
    ///
    /// When several records match, the one with the highest id wins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn find_url_by_key(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Fetches a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError>;

    /// Lists up to `limit` pending records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn list_pending(&self, limit: i64) -> Result<Vec<UrlRecord>, AppError>;

    /// Counts all records and the pending ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors.
    async fn stats(&self) -> Result<RegistryStats, AppError>;
}
