//! SQLite implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::utils::db_error::{UniqueViolation, unique_violation};

/// SQLite repository for URL mapping storage and retrieval.
///
/// All statements use bound parameters. Uniqueness of `url` and `code` is
/// enforced by the unique indexes created in the migrations, so the insert
/// either commits a fully visible record or fails without side effects.
pub struct SqliteUrlRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for SqliteUrlRepository {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let row = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (url, code, created_at)
            VALUES (?, ?, ?)
            RETURNING id, url, code, created_at
            "#,
        )
        .bind(&record.url)
        .bind(&record.code)
        .bind(record.created_at)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(UniqueViolation::Url) => StoreError::DuplicateUrl,
            Some(UniqueViolation::Code) => StoreError::CodeCollision,
            None => StoreError::Database(e),
        })?;

        Ok(row)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecord>(
            "SELECT id, url, code, created_at FROM urls WHERE code = ? LIMIT 1",
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecord>(
            "SELECT id, url, code, created_at FROM urls WHERE url = ? LIMIT 1",
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM urls WHERE created_at < ?")
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
