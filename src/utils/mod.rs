//! Utility functions for URL processing and request handling.
//!
//! This module provides helper functions used across the application:
//!
//! - [`url_normalizer`] - URL validation and canonicalization
//! - [`client_ip`] - Client identity extraction for rate limiting
//! - [`db_error`] - Classification of database constraint violations
//! - [`html_text`] - Markup-to-text reduction for the mnemonic path

pub mod client_ip;
pub mod db_error;
pub mod html_text;
pub mod url_normalizer;
