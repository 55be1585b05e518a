mod actor;
pub mod models;
pub mod panel;
mod scheduler;
pub mod source;

pub use actor::NotificationActorHandle;
pub use panel::{Badge, PanelList, PanelState, PanelView};
pub use scheduler::start_poller;

use crate::components::AppContext;
use crate::config::Config;
use crate::error::AppResult;
use actor::NotificationActor;
use async_trait::async_trait;
use source::{HttpNotificationSource, NotificationSource};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Spawn a notification actor and return its handle
pub fn spawn_actor(
    source: Arc<dyn NotificationSource>,
    view: Arc<dyn PanelView>,
) -> NotificationActorHandle {
    let (mut actor, handle) = NotificationActor::new(source, view);
    tokio::spawn(async move {
        actor.run().await;
    });
    handle
}

/// Notification dropdown: list, unread badge and the periodic count refresh
#[derive(Default)]
pub struct NotificationCenter {
    handle: RwLock<Option<NotificationActorHandle>>,
    poller: RwLock<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<NotificationActorHandle> {
        self.handle.read().await.clone()
    }
}

#[async_trait]
impl super::Component for NotificationCenter {
    fn name(&self) -> &'static str {
        "notifications"
    }

    async fn init(&self, ctx: &AppContext, config: Arc<RwLock<Config>>) -> AppResult<()> {
        let (source, interval) = {
            let config_read = config.read().await;
            (
                HttpNotificationSource::from_config(ctx.http.clone(), &config_read)?,
                config_read.poll_interval(),
            )
        };

        let mut handle_lock = self.handle.write().await;
        let handle = handle_lock
            .get_or_insert_with(|| spawn_actor(Arc::new(source), Arc::clone(&ctx.panel_view)))
            .clone();
        drop(handle_lock);

        if let Err(e) = handle.refresh().await {
            error!("Failed to load notifications: {}", e);
        }

        let mut poller_lock = self.poller.write().await;
        if poller_lock.is_none() {
            let token = CancellationToken::new();
            let task = start_poller(handle, interval, token.clone());
            *poller_lock = Some((token, task));
        }

        info!("Notification center ready");
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        if let Some((token, task)) = self.poller.write().await.take() {
            token.cancel();
            let _ = task.await;
        }

        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
