use crate::config::Config;
use crate::error::AppResult;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

// Export components
pub mod notifications;
pub mod reservation_calendar;

pub use notifications::{NotificationActorHandle, NotificationCenter, PanelView};
pub use reservation_calendar::{
    CalendarAdapterHandle, CalendarControls, RenderSurface, ReservationCalendar,
};

/// Shared collaborators handed to every component on init
#[derive(Clone)]
pub struct AppContext {
    pub http: reqwest::Client,
    pub surface: Arc<dyn RenderSurface>,
    pub panel_view: Arc<dyn PanelView>,
    pub controls: CalendarControls,
}

impl AppContext {
    pub fn new(surface: Arc<dyn RenderSurface>, panel_view: Arc<dyn PanelView>) -> Self {
        Self {
            http: reqwest::Client::new(),
            surface,
            panel_view,
            controls: CalendarControls::new(),
        }
    }
}

/// Component trait that all components must implement
#[async_trait]
pub trait Component: Send + Sync + Any {
    /// Get the name of the component
    fn name(&self) -> &'static str;

    /// Initialize the component
    async fn init(&self, ctx: &AppContext, config: Arc<RwLock<Config>>) -> AppResult<()>;

    /// Shutdown the component
    async fn shutdown(&self) -> AppResult<()>;

    /// Convert to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Manager for all components
pub struct ComponentManager {
    components: Vec<Box<dyn Component>>,
    config: Arc<RwLock<Config>>,
}

impl fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManager")
            .field("component_count", &self.components.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ComponentManager {
    /// Create a new component manager
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            components: Vec::new(),
            config,
        }
    }

    /// Register a component
    pub fn register<T: Component + 'static>(&mut self, component: T) {
        info!("Registering component: {}", component.name());
        self.components.push(Box::new(component));
    }

    /// Initialize every enabled component
    pub async fn init_all(&self, ctx: &AppContext) -> AppResult<()> {
        for component in &self.components {
            let enabled = self.config.read().await.is_component_enabled(component.name());
            if !enabled {
                info!("Component {} is disabled, skipping", component.name());
                continue;
            }

            info!("Initializing component: {}", component.name());
            if let Err(e) = component.init(ctx, Arc::clone(&self.config)).await {
                // Log error but continue with other components
                tracing::error!("Error initializing component {}: {:?}", component.name(), e);
            }
        }

        Ok(())
    }

    /// Shutdown all components
    pub async fn shutdown_all(&self) -> AppResult<()> {
        info!("Shutting down all components");

        for component in &self.components {
            info!("Shutting down component: {}", component.name());

            if let Err(e) = component.shutdown().await {
                // Log error but continue with other components
                tracing::error!(
                    "Error shutting down component {}: {:?}",
                    component.name(),
                    e
                );
            }
        }

        Ok(())
    }

    /// Get a component by name
    pub fn get_component_by_name(&self, name: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Calendar adapter, if the calendar component is running
    pub async fn calendar(&self) -> Option<CalendarAdapterHandle> {
        let component = self.get_component_by_name("reservation_calendar")?;
        let calendar = component.as_any().downcast_ref::<ReservationCalendar>()?;
        calendar.get_handle().await
    }

    /// Notification actor, if the notification component is running
    pub async fn notifications(&self) -> Option<NotificationActorHandle> {
        let component = self.get_component_by_name("notifications")?;
        let center = component.as_any().downcast_ref::<NotificationCenter>()?;
        center.get_handle().await
    }
}
