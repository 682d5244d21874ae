//! Shorten and resolve orchestration.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::services::code_generator::{CodeGenerator, CodeOrigin};
use crate::application::services::rate_limiter::{Admission, FixedWindowLimiter};
use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlRepository};
use crate::error::AppError;
use crate::utils::url_normalizer::{UrlNormalizationError, normalize_url};

/// Service implementing the shorten and resolve use cases.
///
/// This is the only component the HTTP layer calls. It validates input,
/// applies rate limiting, drives code generation, and resolves the store's
/// uniqueness outcomes: a duplicate URL converges on the existing code, a
/// code collision is retried once with a widened hash.
pub struct ShortenService<R: UrlRepository> {
    repository: Arc<R>,
    generator: CodeGenerator,
    limiter: FixedWindowLimiter,
}

impl<R: UrlRepository> ShortenService<R> {
    pub fn new(repository: Arc<R>, generator: CodeGenerator, limiter: FixedWindowLimiter) -> Self {
        Self {
            repository,
            generator,
            limiter,
        }
    }

    /// Shortens `url` on behalf of `client_id`.
    ///
    /// Shortening the same URL twice yields the same record: a live mapping
    /// short-circuits before generation, and an insert race converges on the
    /// winner's record.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for empty or non-absolute-http(s) URLs
    /// - [`AppError::RateLimited`] when `client_id` is inside its cooldown
    /// - [`AppError::Internal`] on storage failures (generic message only)
    pub async fn shorten(
        &self,
        url: &str,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UrlRecord, AppError> {
        let normalized = normalize_url(url).map_err(|e| match e {
            UrlNormalizationError::Empty => {
                AppError::bad_request("URL is required", json!({}))
            }
            other => AppError::bad_request(
                "Invalid URL format",
                json!({ "reason": other.to_string() }),
            ),
        })?;

        if let Admission::Throttled { retry_after } = self.limiter.admit(client_id, now) {
            return Err(AppError::rate_limited(retry_after));
        }

        if let Some(existing) = self
            .repository
            .find_by_url(&normalized)
            .await
            .map_err(storage_error)?
        {
            return Ok(existing);
        }

        let generated = self.generator.generate(&normalized).await;
        if let CodeOrigin::Hash {
            fallback: Some(reason),
        } = &generated.origin
        {
            info!("Falling back to hash code for {}: {}", normalized, reason);
        }

        match self.try_insert(&normalized, generated.code, now).await? {
            Some(record) => Ok(record),
            None => {
                // Code taken by a different URL: one retry with a widened hash.
                let wide = self.generator.disambiguate(&normalized);
                warn!("Short code collision for {}, retrying widened", normalized);

                match self.try_insert(&normalized, wide, now).await? {
                    Some(record) => Ok(record),
                    None => {
                        error!("Widened short code still colliding for {}", normalized);
                        Err(AppError::internal("Storage error", json!({})))
                    }
                }
            }
        }
    }

    /// Resolves a short code to its stored record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or already
    /// swept.
    pub async fn resolve(&self, code: &str) -> Result<UrlRecord, AppError> {
        self.repository
            .find_by_code(code)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| {
                AppError::not_found("Short link not found", json!({ "code": code }))
            })
    }

    /// Attempts one insert.
    ///
    /// Returns `Ok(None)` only for a genuine code collision (the code is
    /// bound to a different URL). A duplicate-URL conflict is resolved here
    /// by re-reading the winner's record; SQLite does not say which unique
    /// index tripped first when both would, so the duplicate probe also runs
    /// on a code collision before the caller burns its retry.
    async fn try_insert(
        &self,
        url: &str,
        code: String,
        now: DateTime<Utc>,
    ) -> Result<Option<UrlRecord>, AppError> {
        let record = NewUrlRecord {
            url: url.to_string(),
            code,
            created_at: now,
        };

        match self.repository.insert(record).await {
            Ok(inserted) => Ok(Some(inserted)),
            Err(StoreError::DuplicateUrl) | Err(StoreError::CodeCollision) => {
                match self
                    .repository
                    .find_by_url(url)
                    .await
                    .map_err(storage_error)?
                {
                    Some(existing) => Ok(Some(existing)),
                    None => Ok(None),
                }
            }
            Err(e) => Err(storage_error(e)),
        }
    }
}

/// Logs the cause and produces the generic storage failure.
fn storage_error(e: StoreError) -> AppError {
    error!("Storage operation failed: {}", e);
    AppError::internal("Storage error", json!({}))
}
