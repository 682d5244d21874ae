//! Slug suggester trait and error types.

use async_trait::async_trait;

/// Errors that can occur while producing a slug suggestion.
///
/// None of these reach API callers: the code generator absorbs every variant
/// and falls back to the deterministic hash path.
#[derive(Debug, thiserror::Error)]
pub enum SlugError {
    #[error("failed to fetch page content: {0}")]
    Fetch(String),

    #[error("summarization request failed: {0}")]
    Remote(String),

    #[error("summarization response was malformed: {0}")]
    MalformedResponse(String),

    #[error("page had no usable text content")]
    EmptyContent,
}

/// Trait for suggesting a human-readable slug for a URL.
///
/// Implementations may perform network I/O and must bound it with a timeout;
/// a slow suggestion is indistinguishable from a failed one to the caller.
/// Returned slugs are advisory: the code generator validates them and
/// discards anything that is not a usable short code.
///
/// # Implementations
///
/// - [`crate::infrastructure::mnemonic::HttpSlugSuggester`] - fetches the page
///   and asks an external summarization service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlugSuggester: Send + Sync {
    /// Suggests a lowercase, hyphen-separated slug describing `url`.
    async fn suggest(&self, url: &str) -> Result<String, SlugError>;
}
