use super::actor::NotificationActorHandle;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Refresh the unread count every `interval` until `token` is cancelled
pub fn start_poller(
    handle: NotificationActorHandle,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    info!("Polling notification count every {}s", interval.as_secs());

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = sleep(interval) => {
                    if let Err(e) = handle.refresh_count().await {
                        error!("Failed to refresh notification count: {}", e);
                        break;
                    }
                }
            }
        }
        info!("Notification poller stopped");
    })
}
