//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{RegistryStats, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use serde_json::json;

const RECORD_COLUMNS: &str =
    "id, url, auto_key, custom_key, status, expired_at, created_at, updated_at";

/// PostgreSQL repository for the `urls` table.
///
/// Uniqueness is enforced by the table constraints; violations are translated
/// by `From<sqlx::Error> for AppError`.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_id_by_url(&self, url: &str) -> Result<Option<i64>, AppError> {
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM urls WHERE url = $1 LIMIT 1")
            .bind(url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(id)
    }

    async fn insert(&self, url: &str) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO urls (url) VALUES ($1) RETURNING id")
            .bind(url)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(id)
    }

    async fn assign_keys(
        &self,
        id: i64,
        auto_key: &str,
        custom_key: Option<String>,
    ) -> Result<UrlRecord, AppError> {
        let query = format!(
            r#"
            UPDATE urls
            SET auto_key = $2,
                custom_key = COALESCE(custom_key, $3),
                updated_at = now()
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        );

        sqlx::query_as::<_, UrlRecord>(&query)
            .bind(id)
            .bind(auto_key)
            .bind(custom_key)
            .fetch_optional(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::not_found("URL record not found", json!({ "id": id })))
    }

    async fn find_url_by_key(&self, key: &str) -> Result<Option<String>, AppError> {
        let url = sqlx::query_scalar::<_, String>(
            r#"
            SELECT url
            FROM urls
            WHERE auto_key = $1 OR custom_key = $1
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>, AppError> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM urls WHERE id = $1");

        let record = sqlx::query_as::<_, UrlRecord>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(record)
    }

    async fn list_pending(&self, limit: i64) -> Result<Vec<UrlRecord>, AppError> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM urls WHERE auto_key IS NULL ORDER BY id ASC LIMIT $1"
        );

        let records = sqlx::query_as::<_, UrlRecord>(&query)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(records)
    }

    async fn stats(&self) -> Result<RegistryStats, AppError> {
        let (total, pending) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE auto_key IS NULL)
            FROM urls
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(RegistryStats { total, pending })
    }
}
