use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;
use url::Url;

/// Default path of the reservations feed on the backend
pub const DEFAULT_RESERVATIONS_PATH: &str = "/user/api/reservations";
/// Default mount point of the notification endpoints
pub const DEFAULT_NOTIFICATIONS_PATH: &str = "/notifications";
/// Unread count refresh cadence in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_LOCALE: &str = "es";

const COMPONENTS_FILE: &str = "config/components.toml";

/// Main configuration structure for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the reservation service, e.g. `http://localhost:5000`
    pub backend_url: String,
    /// Path of the reservations JSON feed
    pub reservations_path: String,
    /// Path prefix of the notification endpoints
    pub notifications_path: String,
    /// Seconds between unread count refreshes
    pub notification_poll_interval: u64,
    /// Timezone used to decide which days are in the past
    pub timezone: String,
    /// Locale for user-facing labels
    pub locale: String,
    /// Space selected when the calendar first opens
    pub space_id: Option<String>,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Self::from_vars(|key| env::var(key).ok())?;

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string(COMPONENTS_FILE) {
            match toml::from_str::<HashMap<String, bool>>(&content) {
                Ok(file_components) => {
                    for (key, value) in file_components {
                        config.components.insert(key, value);
                    }
                }
                Err(e) => tracing::warn!("Ignoring malformed {}: {}", COMPONENTS_FILE, e),
            }
        }

        Ok(config)
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = lookup("BACKEND_URL").ok_or_else(|| env_error("BACKEND_URL"))?;
        Url::parse(&backend_url)
            .map_err(|e| config_error(&format!("Invalid BACKEND_URL '{}': {}", backend_url, e)))?;

        let reservations_path =
            lookup("RESERVATIONS_PATH").unwrap_or_else(|| DEFAULT_RESERVATIONS_PATH.to_string());
        let notifications_path =
            lookup("NOTIFICATIONS_PATH").unwrap_or_else(|| DEFAULT_NOTIFICATIONS_PATH.to_string());

        let notification_poll_interval = match lookup("NOTIFICATION_POLL_INTERVAL") {
            Some(raw) => raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                config_error(&format!("Invalid NOTIFICATION_POLL_INTERVAL format: {}", raw))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let timezone = lookup("TIMEZONE").unwrap_or_else(|| String::from("UTC"));
        timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown TIMEZONE: {}", timezone)))?;

        let locale = lookup("APP_LOCALE").unwrap_or_else(|| String::from(DEFAULT_LOCALE));
        let space_id = lookup("SPACE_ID").filter(|id| !id.trim().is_empty());

        let mut components = HashMap::new();
        components.insert("reservation_calendar".to_string(), true);
        components.insert("notifications".to_string(), true);

        Ok(Config {
            backend_url,
            reservations_path,
            notifications_path,
            notification_poll_interval,
            timezone,
            locale,
            space_id,
            components,
        })
    }

    /// Parsed timezone; falls back to UTC if the stored name no longer parses
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(Tz::UTC)
    }

    /// Interval between notification count refreshes
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.notification_poll_interval)
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }
}
