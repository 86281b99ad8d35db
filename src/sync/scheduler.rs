// Periodic batch scheduler. Sync is pull-based: every interval, run one
// reconciliation batch over the tracked addresses.

use crate::sync::SyncEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub async fn run(engine: Arc<SyncEngine>, period: Duration, shutdown: CancellationToken) {
    info!("Starting sync scheduler with interval {:?}", period);

    let mut ticker = interval(period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match engine.run_batch().await {
                    Ok(report) if report.failed() > 0 => {
                        warn!("sync batch finished with {} failed addresses", report.failed());
                    }
                    Ok(_) => {}
                    Err(e) => error!("sync batch aborted: {}", e),
                }
            }
            _ = shutdown.cancelled() => {
                info!("Shutting down sync scheduler");
                break;
            }
        }
    }
}
