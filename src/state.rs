//! Shared application state injected into HTTP handlers.

use std::sync::Arc;

use crate::application::services::ShortenService;
use crate::infrastructure::persistence::SqliteUrlRepository;

#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<SqliteUrlRepository>>,
    /// Direct repository handle for the health check probe.
    pub repository: Arc<SqliteUrlRepository>,
    /// When true, rate limiting reads the client IP from X-Forwarded-For /
    /// X-Real-IP headers. Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
}
