//! Record entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A stored mapping between a long URL and its short code.
///
/// Records are created on a successful shorten request, never updated in
/// place, and removed by the cleanup sweep once older than the retention
/// window. `url` and `code` are each unique among live records.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UrlRecord {
    pub id: i64,
    pub url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Returns true if the record is older than `retention` as of `now`.
    ///
    /// Expiry is eventual: an expired record remains resolvable until the
    /// next cleanup sweep deletes it.
    pub fn is_expired(&self, retention: chrono::Duration, now: DateTime<Utc>) -> bool {
        self.created_at < now - retention
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone)]
pub struct NewUrlRecord {
    pub url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
