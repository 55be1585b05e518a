use super::panel::{badge_for_count, build_list, list_error, PanelState, PanelView};
use super::source::NotificationSource;
use crate::error::{component_error, AppResult};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Commands that can be sent to the notification actor
pub enum NotificationCommand {
    /// Reload both the list and the unread count
    Refresh,
    RefreshCount,
    MarkRead(String, mpsc::Sender<AppResult<bool>>),
    MarkAllRead(mpsc::Sender<AppResult<bool>>),
    Snapshot(mpsc::Sender<PanelState>),
    Shutdown,
}

/// Handle for communicating with the notification actor
#[derive(Clone)]
pub struct NotificationActorHandle {
    command_tx: mpsc::Sender<NotificationCommand>,
}

impl NotificationActorHandle {
    async fn send(&self, command: NotificationCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| component_error(&format!("Notification mailbox error: {}", e)))
    }

    pub async fn refresh(&self) -> AppResult<()> {
        self.send(NotificationCommand::Refresh).await
    }

    pub async fn refresh_count(&self) -> AppResult<()> {
        self.send(NotificationCommand::RefreshCount).await
    }

    pub async fn mark_read(&self, id: String) -> AppResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(NotificationCommand::MarkRead(id, response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    pub async fn mark_all_read(&self) -> AppResult<bool> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(NotificationCommand::MarkAllRead(response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    pub async fn snapshot(&self) -> AppResult<PanelState> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(NotificationCommand::Snapshot(response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))
    }

    pub async fn shutdown(&self) -> AppResult<()> {
        let _ = self.command_tx.send(NotificationCommand::Shutdown).await;
        Ok(())
    }
}

/// The notification actor; owns the panel state
pub struct NotificationActor {
    source: Arc<dyn NotificationSource>,
    view: Arc<dyn PanelView>,
    state: PanelState,
    command_rx: mpsc::Receiver<NotificationCommand>,
}

impl NotificationActor {
    /// Create a new actor and return its handle
    pub fn new(
        source: Arc<dyn NotificationSource>,
        view: Arc<dyn PanelView>,
    ) -> (Self, NotificationActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let actor = Self {
            source,
            view,
            state: PanelState::default(),
            command_rx,
        };
        (actor, NotificationActorHandle { command_tx })
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Notification actor started");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                NotificationCommand::Refresh => {
                    self.load_list().await;
                    self.load_count().await;
                    self.publish();
                }
                NotificationCommand::RefreshCount => {
                    if self.load_count().await {
                        self.publish();
                    }
                }
                NotificationCommand::MarkRead(id, response_tx) => {
                    let result = self.source.mark_read(&id).await;
                    self.after_action(&result).await;
                    let _ = response_tx.send(result).await;
                }
                NotificationCommand::MarkAllRead(response_tx) => {
                    let result = self.source.mark_all_read().await;
                    self.after_action(&result).await;
                    let _ = response_tx.send(result).await;
                }
                NotificationCommand::Snapshot(response_tx) => {
                    let _ = response_tx.send(self.state.clone()).await;
                }
                NotificationCommand::Shutdown => {
                    info!("Notification actor shutting down");
                    break;
                }
            }
        }

        info!("Notification actor shut down");
    }

    async fn load_list(&mut self) {
        self.state.list = match self.source.list(true).await {
            Ok(notifications) => build_list(notifications, Utc::now()),
            Err(e) => {
                error!("Error loading notifications: {}", e);
                list_error()
            }
        };
    }

    /// Returns whether the badge changed
    async fn load_count(&mut self) -> bool {
        match self.source.unread_count().await {
            Ok(count) => {
                let badge = badge_for_count(count);
                let changed = badge != self.state.badge;
                self.state.badge = badge;
                changed
            }
            Err(e) => {
                error!("Error updating notification count: {}", e);
                false
            }
        }
    }

    async fn after_action(&mut self, result: &AppResult<bool>) {
        match result {
            Ok(true) => {
                self.load_count().await;
                self.load_list().await;
                self.publish();
            }
            Ok(false) => warn!("Backend refused to mark notifications as read"),
            Err(e) => error!("Error marking notifications as read: {}", e),
        }
    }

    fn publish(&self) {
        self.view.render_panel(&self.state);
    }
}
