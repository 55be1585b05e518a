use super::actor::{AdapterSnapshot, CalendarActor, CalendarActorHandle};
use super::models::NormalizedEntry;
use super::range::DateWindow;
use super::source::ReservationSource;
use super::surface::RenderSurface;
use crate::error::AppResult;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::error;

/// Handle for interacting with the calendar adapter
#[derive(Clone)]
pub struct CalendarAdapterHandle {
    actor_handle: CalendarActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl CalendarAdapterHandle {
    /// Create a new adapter and spawn its actor
    pub fn new(
        source: Arc<dyn ReservationSource>,
        surface: Arc<dyn RenderSurface>,
        timezone: Tz,
    ) -> Self {
        let (mut actor, handle) = CalendarActor::new(source, surface, timezone);

        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Pull entries for a window; failures come back as an empty list
    pub async fn load_window(&self, window: DateWindow) -> Vec<NormalizedEntry> {
        match self.actor_handle.load_window(window).await {
            Ok(entries) => entries,
            Err(e) => {
                error!("Calendar adapter unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Show a new window; the surface is updated when the fetch completes
    pub async fn change_window(&self, window: DateWindow) -> AppResult<()> {
        self.actor_handle.change_window(window).await
    }

    pub async fn set_space_filter(&self, space_id: Option<String>) -> AppResult<()> {
        self.actor_handle.set_space_filter(space_id).await
    }

    /// Look up an entry of the currently shown view
    pub async fn find_entry(&self, id: &str) -> AppResult<Option<NormalizedEntry>> {
        self.actor_handle.find_entry(id.to_string()).await
    }

    pub async fn snapshot(&self) -> AppResult<AdapterSnapshot> {
        self.actor_handle.snapshot().await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> AppResult<()> {
        self.actor_handle.shutdown().await
    }
}
