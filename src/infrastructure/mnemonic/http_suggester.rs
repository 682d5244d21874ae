//! HTTP-backed slug suggester.
//!
//! Fetches the target page, reduces it to plain text, and asks an external
//! summarization service for a short slug. Every request carries the
//! configured timeout so a slow dependency cannot stall the shorten path.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::suggester::{SlugError, SlugSuggester};
use crate::utils::html_text::strip_markup;

/// Maximum characters of page text sent to the summarization service.
const MAX_CONTENT_CHARS: usize = 2000;

/// Expected response body from the summarization endpoint.
#[derive(Debug, Deserialize)]
struct SlugResponse {
    slug: String,
}

/// Slug suggester backed by an external summarization service.
///
/// The wire contract is deliberately narrow: `POST { "text": ... }` with a
/// bearer credential, answered by `{ "slug": ... }`. Prompting and model
/// choice live entirely on the service side.
pub struct HttpSlugSuggester {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpSlugSuggester {
    /// Builds a suggester with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Remote`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, SlugError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SlugError::Remote(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    /// Downloads the page and reduces it to bounded plain text.
    async fn fetch_page_text(&self, url: &str) -> Result<String, SlugError> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SlugError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| SlugError::Fetch(e.to_string()))?
            .text()
            .await
            .map_err(|e| SlugError::Fetch(e.to_string()))?;

        let text = strip_markup(&body, MAX_CONTENT_CHARS);
        if text.trim().is_empty() {
            return Err(SlugError::EmptyContent);
        }

        Ok(text)
    }
}

#[async_trait]
impl SlugSuggester for HttpSlugSuggester {
    async fn suggest(&self, url: &str) -> Result<String, SlugError> {
        let text = self.fetch_page_text(url).await?;

        debug!("Requesting slug suggestion ({} chars of content)", text.len());

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| SlugError::Remote(e.to_string()))?
            .error_for_status()
            .map_err(|e| SlugError::Remote(e.to_string()))?;

        let parsed: SlugResponse = response
            .json()
            .await
            .map_err(|e| SlugError::MalformedResponse(e.to_string()))?;

        Ok(parsed.slug)
    }
}
