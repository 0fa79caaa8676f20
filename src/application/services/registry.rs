//! Deduplicating URL registry.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, error, info};

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Pause before re-running the lookup after losing an insert race.
const CONFLICT_RETRY_DELAY: Duration = Duration::from_millis(5);

/// Maps each normalized URL to exactly one record id.
///
/// `find_or_create` is a select followed by an insert. Two callers can both
/// miss the select; the store's unique constraint on `url` rejects the second
/// insert with [`AppError::Conflict`], and the loser re-runs the lookup to
/// pick up the winner's id. Conflicts never leave this type.
pub struct Registry {
    repository: Arc<dyn UrlRepository>,
    conflict_retries: usize,
}

impl Registry {
    pub fn new(repository: Arc<dyn UrlRepository>, conflict_retries: usize) -> Self {
        Self {
            repository,
            conflict_retries,
        }
    }

    /// Returns the id of the record holding `url`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on backend errors, or if the lookup keeps
    /// losing races after all retries.
    pub async fn find_or_create(&self, url: &str) -> Result<i64, AppError> {
        let strategy = FixedInterval::new(CONFLICT_RETRY_DELAY).take(self.conflict_retries);

        let result = RetryIf::start(
            strategy,
            || self.lookup_or_insert(url),
            |err: &AppError| {
                if err.is_conflict() {
                    debug!(url, "lost insert race, retrying lookup");
                    true
                } else {
                    false
                }
            },
        )
        .await;

        match result {
            Err(err) if err.is_conflict() => {
                error!(
                    url,
                    retries = self.conflict_retries,
                    "registry did not converge after conflict retries"
                );
                Err(AppError::storage(
                    "Storage error",
                    json!({ "reason": "conflict retries exhausted" }),
                ))
            }
            other => other,
        }
    }

    async fn lookup_or_insert(&self, url: &str) -> Result<i64, AppError> {
        if let Some(id) = self.repository.find_id_by_url(url).await? {
            return Ok(id);
        }

        let id = self.repository.insert(url).await?;
        info!(id, "registered new URL");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use mockall::Sequence;

    fn conflict() -> AppError {
        AppError::from_unique_violation(Some(crate::error::URL_UNIQUE_CONSTRAINT))
    }

    #[tokio::test]
    async fn test_returns_existing_id_without_insert() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_id_by_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(|_| Ok(Some(5)));
        repo.expect_insert().times(0);

        let registry = Registry::new(Arc::new(repo), 3);

        assert_eq!(registry.find_or_create("https://example.com").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_inserts_when_absent() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_id_by_url()
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_insert().times(1).returning(|_| Ok(11));

        let registry = Registry::new(Arc::new(repo), 3);

        assert_eq!(registry.find_or_create("https://example.com").await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_conflict_retries_lookup_and_returns_winner() {
        let mut repo = MockUrlRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_id_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(conflict()));
        repo.expect_find_id_by_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(7)));

        let registry = Registry::new(Arc::new(repo), 3);

        assert_eq!(registry.find_or_create("https://example.com").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_exhausted_conflicts_become_storage_error() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_id_by_url()
            .times(3)
            .returning(|_| Ok(None));
        repo.expect_insert().times(3).returning(|_| Err(conflict()));

        let registry = Registry::new(Arc::new(repo), 2);

        let err = registry
            .find_or_create("https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_storage_error_is_not_retried() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_id_by_url()
            .times(1)
            .returning(|_| Err(AppError::storage("Storage error", json!({}))));
        repo.expect_insert().times(0);

        let registry = Registry::new(Arc::new(repo), 3);

        let err = registry
            .find_or_create("https://example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Storage { .. }));
    }
}
