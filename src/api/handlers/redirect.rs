//! Handler for short URL redirects.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Responds with `302 Found` and a `Location` header. Expiry is eventual: a
/// record past its retention window still redirects until the cleanup sweep
/// removes it.
///
/// # Errors
///
/// Returns `404 Not Found` if the code is unknown or already swept.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.shorten_service.resolve(&code).await?;

    debug!("Redirecting {} -> {}", code, record.url);

    Ok((StatusCode::FOUND, [(header::LOCATION, record.url)]))
}
