//! SQLite repository implementation.
//!
//! Concrete implementation of the domain repository trait using SQLx with
//! bound parameters throughout.

pub mod sqlite_url_repository;

pub use sqlite_url_repository::SqliteUrlRepository;
