//! Repository trait for short URL data access.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Errors surfaced by a [`UrlRepository`].
///
/// The uniqueness outcomes are first-class variants so callers resolve them
/// by policy rather than by re-parsing database errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The URL already has a live record; the existing code stands.
    #[error("url already has a short code")]
    DuplicateUrl,

    /// The code is already bound to a different URL; the mapping was not touched.
    #[error("short code is already in use")]
    CodeCollision,

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

/// Repository interface for the short URL store.
///
/// The store owns the uniqueness invariants: at most one live record per
/// `url` and per `code`, enforced by storage-level unique indexes so the
/// guarantees hold across concurrent writers and process restarts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteUrlRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// The insert is atomic with respect to both uniqueness invariants: of
    /// two concurrent inserts for the same URL exactly one wins and the
    /// other observes [`StoreError::DuplicateUrl`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateUrl`] if the URL already has a live record
    /// - [`StoreError::CodeCollision`] if the code is bound to a different URL
    /// - [`StoreError::Database`] on other database errors
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Finds a record by its short code.
    ///
    /// Pure read: an expired-but-not-yet-swept record is still returned.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Finds a record by its long URL.
    ///
    /// Used to detect that a URL has already been shortened.
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Deletes all records created strictly before `cutoff`.
    ///
    /// Returns the number of records removed. Safe to run concurrently with
    /// inserts and lookups; no record is ever partially visible.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    /// Counts stored records. Used by the health check.
    async fn count(&self) -> Result<i64, StoreError>;
}
