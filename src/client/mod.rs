//! HTTP client for the dashboard API.
//!
//! [`DashboardApi`] is the seam the poller talks through; [`HttpDashboardClient`]
//! implements it over `reqwest` with connection pooling.

mod error;
mod types;

pub use error::*;
pub use types::*;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const STATS_PATH: &str = "/api/stats";
pub const REGIONS_PATH: &str = "/api/regions";
pub const LAG_SOURCES_PATH: &str = "/api/lag-sources";
pub const PLAYERS_PATH: &str = "/api/players";
pub const SETTINGS_PATH: &str = "/api/settings";

/// Read and write access to a dashboard backend.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, PollError>;

    async fn fetch_regions(&self) -> Result<RegionsSnapshot, PollError>;

    async fn fetch_lag_sources(&self) -> Result<LagSourcesSnapshot, PollError>;

    async fn fetch_players(&self) -> Result<PlayersSnapshot, PollError>;

    async fn fetch_settings(&self) -> Result<RemoteSettings, PollError>;

    /// Post a settings change. The backend's acknowledgement body is returned
    /// as-is; an empty or non-JSON body yields `Value::Null`.
    async fn post_settings(&self, update: &SettingsUpdate) -> Result<serde_json::Value, PollError>;
}

/// `reqwest`-backed [`DashboardApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpDashboardClient {
    base_url: String,
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl HttpDashboardClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, PollError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| PollError::ConnectionFailed(e.to_string()))?;
        Ok(Self::with_client(base_url, timeout_seconds, client))
    }

    /// Create a client with a custom HTTP client (for testing).
    pub fn with_client(
        base_url: impl Into<String>,
        timeout_seconds: u64,
        client: reqwest::Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            timeout_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<String, PollError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(PollError::InvalidUrl(self.base_url.clone()));
        }
        Ok(format!("{}{}", self.base_url, path))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, PollError> {
        let url = self.url(path)?;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PollError::from_reqwest(e, self.timeout_seconds))?;

        if !response.status().is_success() {
            return Err(PollError::HttpError(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PollError::from_reqwest(e, self.timeout_seconds))?;
        serde_json::from_str(&body).map_err(|e| PollError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, PollError> {
        self.get_json(STATS_PATH).await
    }

    async fn fetch_regions(&self) -> Result<RegionsSnapshot, PollError> {
        self.get_json(REGIONS_PATH).await
    }

    async fn fetch_lag_sources(&self) -> Result<LagSourcesSnapshot, PollError> {
        self.get_json(LAG_SOURCES_PATH).await
    }

    async fn fetch_players(&self) -> Result<PlayersSnapshot, PollError> {
        self.get_json(PLAYERS_PATH).await
    }

    async fn fetch_settings(&self) -> Result<RemoteSettings, PollError> {
        self.get_json(SETTINGS_PATH).await
    }

    async fn post_settings(&self, update: &SettingsUpdate) -> Result<serde_json::Value, PollError> {
        let url = self.url(SETTINGS_PATH)?;
        let response = self
            .client
            .post(&url)
            .form(update)
            .send()
            .await
            .map_err(|e| PollError::from_reqwest(e, self.timeout_seconds))?;

        if !response.status().is_success() {
            return Err(PollError::HttpError(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PollError::from_reqwest(e, self.timeout_seconds))?;
        Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::Null))
    }
}
