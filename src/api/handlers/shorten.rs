//! Handler for the link shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::HeaderMap,
};
use chrono::Utc;
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_identity;

/// Creates a short code for a long URL.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// # Response
///
/// ```json
/// { "shortCode": "AbCd12_-" }
/// ```
///
/// Shortening the same URL again returns the same code.
///
/// # Errors
///
/// - `400 Bad Request` for a missing, empty, or malformed URL
/// - `429 Too Many Requests` with a `Retry-After` header when the client is
///   inside its cooldown window
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let client_id = client_identity(&headers, addr, state.behind_proxy);

    let record = state
        .shorten_service
        .shorten(&payload.url, &client_id, Utc::now())
        .await?;

    Ok(Json(ShortenResponse {
        short_code: record.code,
    }))
}
