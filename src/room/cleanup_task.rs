use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, info, instrument};

use crate::websockets::RoomCoordinator;

/// Starts the background task that deletes expired rooms
///
/// Commands sweep lazily too; this catches rooms nobody talks to anymore.
#[instrument(skip(coordinator))]
pub async fn start_cleanup_task(coordinator: Arc<RoomCoordinator>, sweep_interval: Duration) {
    info!(
        sweep_interval_secs = sweep_interval.as_secs(),
        "Starting room expiry background task"
    );

    let mut ticker = interval(sweep_interval);

    loop {
        ticker.tick().await;
        run_sweep(&coordinator).await;
    }
}

async fn run_sweep(coordinator: &RoomCoordinator) -> usize {
    let expired = coordinator.expire_rooms().await;
    if expired > 0 {
        info!(expired_count = expired, "Expired rooms deleted");
    } else {
        debug!("No expired rooms");
    }
    expired
}
