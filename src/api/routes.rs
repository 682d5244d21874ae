//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten` - Create a short code for a URL
pub fn routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}
