//! Periodic expiry sweep over the URL store.
//!
//! Spawned once from `server::run`. Every `interval` the worker deletes
//! records older than `retention`. A failing sweep is logged and the loop
//! continues; a shutdown signal stops scheduling while letting an in-flight
//! sweep finish.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::domain::repositories::UrlRepository;

/// Runs the cleanup loop until `shutdown` flips to `true`.
///
/// The first sweep happens one full `interval` after startup, not
/// immediately.
pub async fn run_cleanup_worker<R: UrlRepository>(
    repository: Arc<R>,
    retention: chrono::Duration,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(
        "Cleanup worker started (interval: {:?}, retention: {}h)",
        interval,
        retention.num_hours()
    );

    let mut ticker = tokio::time::interval(interval);
    // interval fires immediately on the first tick; consume it so the first
    // sweep waits a full period.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                sweep(repository.as_ref(), retention).await;
            }
            changed = shutdown.changed() => {
                // A dropped sender means the server is gone; stop either way.
                if changed.is_err() || *shutdown.borrow() {
                    info!("Cleanup worker stopping");
                    return;
                }
            }
        }
    }
}

/// A single sweep. Errors are logged, never propagated.
async fn sweep<R: UrlRepository>(repository: &R, retention: chrono::Duration) {
    let cutoff = Utc::now() - retention;

    match repository.delete_created_before(cutoff).await {
        Ok(0) => debug!("Cleanup sweep removed no records"),
        Ok(removed) => info!("Cleanup sweep removed {} expired records", removed),
        Err(e) => error!("Cleanup sweep failed: {}", e),
    }
}
