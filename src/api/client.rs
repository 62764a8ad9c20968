//! Summary REST Client
//!
//! HTTP client for the train counter server's summary endpoints.

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{normalize_base_url, DAILY_SUMMARY_PATH, ENGINES_BY_DIRECTION_PATH, RECENT_TRAINS_PATH};
use crate::config::ServerConfig;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{DailySummaryPoint, DataEnvelope, EngineDirectionCount, RecentTrainPoint};

/// REST client bound to one server
#[derive(Debug, Clone)]
pub struct SummaryClient {
    client: Client,
    base_url: String,
}

impl SummaryClient {
    /// Create a client for the configured server
    pub fn new(config: &ServerConfig) -> DashboardResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Normalized base URL (no trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/summary/daily`
    pub async fn fetch_daily_summary(&self) -> DashboardResult<Vec<DailySummaryPoint>> {
        self.get_data(DAILY_SUMMARY_PATH).await
    }

    /// `GET /api/trains/recent`
    pub async fn fetch_recent_trains(&self) -> DashboardResult<Vec<RecentTrainPoint>> {
        self.get_data(RECENT_TRAINS_PATH).await
    }

    /// `GET /api/engines/by_direction`
    pub async fn fetch_engines_by_direction(&self) -> DashboardResult<Vec<EngineDirectionCount>> {
        self.get_data(ENGINES_BY_DIRECTION_PATH).await
    }

    /// Fetch an endpoint and unwrap its `data` array.
    ///
    /// Transport failures, non-success statuses and undecodable bodies are
    /// reported as distinct errors.
    async fn get_data<T: DeserializeOwned>(&self, endpoint: &str) -> DashboardResult<Vec<T>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: DataEnvelope<T> = serde_json::from_slice(&body)?;

        tracing::debug!(endpoint, rows = envelope.data.len(), "Fetched summary data");
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_normalizes_base_url() {
        let config = ServerConfig {
            base_url: "http://localhost:8000/".to_string(),
            request_timeout_secs: 5,
        };
        let client = SummaryClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_client_rejects_bad_base_url() {
        let config = ServerConfig {
            base_url: "localhost:8000".to_string(),
            request_timeout_secs: 5,
        };
        assert!(matches!(
            SummaryClient::new(&config),
            Err(DashboardError::InvalidUrl(_))
        ));
    }
}
