//! Periodic removal of expired and revoked refresh-token sessions.

use std::time::Duration;

use chrono::Utc;
use timeline_db::repositories::SessionRepo;
use timeline_db::DbPool;
use tokio_util::sync::CancellationToken;

/// Run the session cleanup loop until `cancel` fires.
pub async fn run(pool: DbPool, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Session cleanup job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session cleanup job stopping");
                break;
            }
            _ = ticker.tick() => {
                match SessionRepo::cleanup_expired(&pool, Utc::now()).await {
                    Ok(0) => tracing::debug!("Session cleanup: nothing to purge"),
                    Ok(deleted) => tracing::info!(deleted, "Session cleanup: purged sessions"),
                    Err(e) => tracing::error!(error = %e, "Session cleanup failed"),
                }
            }
        }
    }
}
