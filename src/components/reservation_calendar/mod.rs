mod actor;
pub mod controls;
pub mod days;
mod handle;
pub mod interaction;
pub mod models;
pub mod normalize;
pub mod range;
pub mod source;
pub mod surface;

pub use actor::{fetch_window, AdapterSnapshot, AdapterStats};
pub use controls::CalendarControls;
pub use handle::CalendarAdapterHandle;
pub use models::{NormalizedEntry, RawReservation};
pub use range::{DateWindow, MonthView};
pub use surface::{CalendarView, RenderSurface};

use crate::components::AppContext;
use crate::config::Config;
use crate::error::AppResult;
use crate::utils::subscription::Subscription;
use async_trait::async_trait;
use rust_i18n::t;
use source::HttpReservationSource;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Reservation calendar component: adapter actor plus its control subscriptions
#[derive(Default)]
pub struct ReservationCalendar {
    handle: RwLock<Option<CalendarAdapterHandle>>,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl ReservationCalendar {
    /// Create a new reservation calendar component
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<CalendarAdapterHandle> {
        self.handle.read().await.clone()
    }
}

#[async_trait]
impl super::Component for ReservationCalendar {
    fn name(&self) -> &'static str {
        "reservation_calendar"
    }

    async fn init(&self, ctx: &AppContext, config: Arc<RwLock<Config>>) -> AppResult<()> {
        let (source, timezone) = {
            let config_read = config.read().await;
            (
                HttpReservationSource::from_config(ctx.http.clone(), &config_read),
                config_read.tz(),
            )
        };
        let source = match source {
            Ok(source) => source,
            Err(e) => {
                ctx.surface
                    .show_error(&t!("calendar_error", error = e.to_string()));
                return Err(e);
            }
        };

        let mut handle_lock = self.handle.write().await;
        let handle = handle_lock
            .get_or_insert_with(|| {
                CalendarAdapterHandle::new(Arc::new(source), Arc::clone(&ctx.surface), timezone)
            })
            .clone();
        drop(handle_lock);

        let window_handle = handle.clone();
        let on_window = ctx.controls.on_window_change(move |window| {
            let handle = window_handle.clone();
            async move {
                if let Err(e) = handle.change_window(window).await {
                    error!("Failed to change calendar window: {}", e);
                }
            }
        });

        let filter_handle = handle;
        let on_filter = ctx.controls.on_filter_change(move |space_id| {
            let handle = filter_handle.clone();
            async move {
                if let Err(e) = handle.set_space_filter(space_id).await {
                    error!("Failed to change space filter: {}", e);
                }
            }
        });

        self.subscriptions.write().await.extend([on_window, on_filter]);
        info!("Reservation calendar ready");
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        for subscription in self.subscriptions.write().await.drain(..) {
            subscription.dispose().await;
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
