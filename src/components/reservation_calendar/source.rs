use super::models::RawReservation;
use crate::config::Config;
use crate::error::{backend_error, config_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Where raw reservation records come from
#[async_trait]
pub trait ReservationSource: Send + Sync {
    /// Fetch every visible reservation, optionally restricted to one space
    async fn fetch_reservations(&self, space_id: Option<&str>) -> AppResult<Vec<RawReservation>>;
}

/// Reservation feed served by the booking backend
#[derive(Debug, Clone)]
pub struct HttpReservationSource {
    client: Client,
    endpoint: Url,
}

impl HttpReservationSource {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn from_config(client: Client, config: &Config) -> AppResult<Self> {
        let endpoint = Url::parse(&config.backend_url)
            .and_then(|base| base.join(&config.reservations_path))
            .map_err(|e| config_error(&format!("Invalid reservations endpoint: {}", e)))?;
        Ok(Self::new(client, endpoint))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ReservationSource for HttpReservationSource {
    async fn fetch_reservations(&self, space_id: Option<&str>) -> AppResult<Vec<RawReservation>> {
        let mut url = self.endpoint.clone();
        if let Some(space_id) = space_id.filter(|id| !id.is_empty()) {
            url.query_pairs_mut().append_pair("space_id", space_id);
        }

        debug!("Fetching reservations from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| backend_error(&format!("Failed to fetch reservations: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(backend_error(&format!(
                "Failed to fetch reservations: HTTP {} - {}",
                status, error_body
            )));
        }

        let records: Vec<Value> = response
            .json()
            .await
            .map_err(|e| backend_error(&format!("Failed to parse reservations response: {}", e)))?;

        Ok(parse_reservations(records))
    }
}

/// Decode records one by one so a single malformed record only drops itself
pub fn parse_reservations(records: Vec<Value>) -> Vec<RawReservation> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(raw) => Some(raw),
            Err(e) => {
                warn!(index, "Dropping malformed reservation record: {}", e);
                None
            }
        })
        .collect()
}
