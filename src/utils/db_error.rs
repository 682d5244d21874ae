//! Classification of SQLite unique-constraint violations.
//!
//! SQLite does not report constraint names through the driver, only a message
//! of the form `UNIQUE constraint failed: urls.url`, so classification matches
//! on the offending column path.

/// Which unique index an insert tripped over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueViolation {
    /// The long URL already has a record.
    Url,
    /// The short code is already bound.
    Code,
}

/// Inspects a SQLx error for a unique violation on the `urls` table.
///
/// Returns `None` for anything that is not a unique-constraint failure on a
/// known column, leaving the caller to treat it as a generic database error.
pub fn unique_violation(e: &sqlx::Error) -> Option<UniqueViolation> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    let message = db_err.message();
    if message.contains("urls.url") {
        Some(UniqueViolation::Url)
    } else if message.contains("urls.code") {
        Some(UniqueViolation::Code)
    } else {
        None
    }
}
