//! Configuration for the poll loops.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling cadence and offline detection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Whether the stats loop runs on a timer
    pub auto_refresh: bool,
    /// Seconds between stats polls
    pub refresh_interval_seconds: u64,
    /// Seconds between regions polls
    pub regions_interval_seconds: u64,
    /// Seconds between lag-source polls
    pub lag_sources_interval_seconds: u64,
    /// Consecutive stats failures before the backend is shown as offline
    pub failure_threshold: u32,
    /// Chart points retained per series
    pub history_capacity: usize,
}

impl PollerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn regions_interval(&self) -> Duration {
        Duration::from_secs(self.regions_interval_seconds)
    }

    pub fn lag_sources_interval(&self) -> Duration {
        Duration::from_secs(self.lag_sources_interval_seconds)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            auto_refresh: true,
            refresh_interval_seconds: 2,
            regions_interval_seconds: 2,
            lag_sources_interval_seconds: 2,
            failure_threshold: 3,
            history_capacity: 60,
        }
    }
}
