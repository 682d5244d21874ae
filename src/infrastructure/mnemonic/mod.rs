//! Pluggable slug suggestion for mnemonic short codes.
//!
//! The generator asks a [`SlugSuggester`] for a human-readable slug and falls
//! back to deterministic hashing when the suggester fails, so everything in
//! this module is best-effort by contract.

pub mod http_suggester;
pub mod suggester;

pub use http_suggester::HttpSlugSuggester;
pub use suggester::{SlugError, SlugSuggester};

#[cfg(test)]
pub use suggester::MockSlugSuggester;
