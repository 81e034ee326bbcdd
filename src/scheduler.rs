//! Periodic re-sync of the selected calendars.

use crate::engine::CalendarSyncEngine;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Sync every `interval` while calendars are selected, until `shutdown`
/// is cancelled. The first run happens one interval after the start.
/// Failures are already recorded by the engine; the loop keeps going.
pub async fn run_sync_loop(engine: Arc<CalendarSyncEngine>, interval: Duration, shutdown: CancellationToken) {
    info!("Starting sync loop (every {}s)", interval.as_secs());

    loop {
        tokio::select! {
            _ = sleep(interval) => {}
            _ = shutdown.cancelled() => {
                info!("Shutdown signal received, stopping sync loop");
                break;
            }
        }

        if engine.has_selection().await {
            let result = engine.sync_local_calendars().await;
            if result.skipped {
                debug!("Previous sync still running, skipped this cycle");
            } else if let Some(message) = result.error_message {
                warn!("Periodic sync failed: {}", message);
            }
        } else {
            debug!("No calendars selected, nothing to sync");
        }
    }

    info!("Sync loop stopped gracefully");
}
