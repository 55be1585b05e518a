use super::models::{ActionResponse, Notification, UnreadCount};
use crate::config::Config;
use crate::error::{backend_error, config_error, AppResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Notification endpoints of the backend
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn list(&self, unread_only: bool) -> AppResult<Vec<Notification>>;
    async fn unread_count(&self) -> AppResult<i64>;
    /// Returns the backend's `success` flag
    async fn mark_read(&self, id: &str) -> AppResult<bool>;
    async fn mark_all_read(&self) -> AppResult<bool>;
}

#[derive(Debug, Clone)]
pub struct HttpNotificationSource {
    client: Client,
    base: Url,
}

impl HttpNotificationSource {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    pub fn from_config(client: Client, config: &Config) -> AppResult<Self> {
        // Trailing slash so that relative joins stay under the prefix
        let prefix = format!("{}/", config.notifications_path.trim_end_matches('/'));
        let base = Url::parse(&config.backend_url)
            .and_then(|url| url.join(&prefix))
            .map_err(|e| config_error(&format!("Invalid notifications endpoint: {}", e)))?;
        Ok(Self::new(client, base))
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base
            .join(path)
            .map_err(|e| backend_error(&format!("Invalid notifications path '{}': {}", path, e)))
    }
}

#[async_trait]
impl NotificationSource for HttpNotificationSource {
    async fn list(&self, unread_only: bool) -> AppResult<Vec<Notification>> {
        let mut url = self.endpoint("api/list")?;
        url.query_pairs_mut()
            .append_pair("unread_only", if unread_only { "true" } else { "false" });
        debug!("Fetching notifications from {}", url);
        let response = self.client.get(url).send().await?;
        let rows: Vec<Value> = read_json(response, "notifications").await?;
        Ok(parse_notifications(rows))
    }

    async fn unread_count(&self) -> AppResult<i64> {
        let response = self.client.get(self.endpoint("api/unread_count")?).send().await?;
        let body: UnreadCount = read_json(response, "unread count").await?;
        Ok(body.count)
    }

    async fn mark_read(&self, id: &str) -> AppResult<bool> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| backend_error("Notifications base URL cannot hold a path"))?
            .pop_if_empty()
            .extend([id, "read"]);
        let response = self.client.post(url).json(&serde_json::json!({})).send().await?;
        read_action(response).await
    }

    async fn mark_all_read(&self) -> AppResult<bool> {
        let response = self
            .client
            .post(self.endpoint("mark_all_read")?)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        read_action(response).await
    }
}

/// Decode rows one by one so a single malformed row only drops itself
pub fn parse_notifications(rows: Vec<Value>) -> Vec<Notification> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(notification) => Some(notification),
            Err(e) => {
                warn!(index, "Dropping malformed notification: {}", e);
                None
            }
        })
        .collect()
}

async fn read_json<T: DeserializeOwned>(response: Response, what: &str) -> AppResult<T> {
    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(backend_error(&format!(
            "Failed to fetch {}: HTTP {} - {}",
            what, status, error_body
        )));
    }
    response
        .json()
        .await
        .map_err(|e| backend_error(&format!("Failed to parse {} response: {}", what, e)))
}

/// The backend answers `{success: false}` with a 400, so the body decides
async fn read_action(response: Response) -> AppResult<bool> {
    let status = response.status();
    let text = response.text().await?;
    match serde_json::from_str::<ActionResponse>(&text) {
        Ok(body) => Ok(body.success),
        Err(_) if !status.is_success() => Err(backend_error(&format!(
            "Notification action failed: HTTP {} - {}",
            status, text
        ))),
        Err(e) => Err(e.into()),
    }
}
