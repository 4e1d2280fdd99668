//! Poller state and per-source health tracking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::mem;
use std::time::Duration;

/// The three endpoints the poller watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollSource {
    Stats,
    Regions,
    LagSources,
}

impl PollSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollSource::Stats => "stats",
            PollSource::Regions => "regions",
            PollSource::LagSources => "lag_sources",
        }
    }
}

/// Health of a single data source.
///
/// `Unknown` is displayed as healthy; it only means nothing has completed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "failures")]
pub enum SourceHealth {
    Unknown,
    Healthy,
    /// Failing, but below the offline threshold
    Degraded(u32),
    Offline,
}

impl SourceHealth {
    pub fn is_offline(&self) -> bool {
        matches!(self, SourceHealth::Offline)
    }
}

/// Failure accounting for one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceState {
    pub consecutive_failures: u32,
    pub health: SourceHealth,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Default for SourceState {
    fn default() -> Self {
        Self {
            consecutive_failures: 0,
            health: SourceHealth::Unknown,
            last_success: None,
            last_error: None,
        }
    }
}

impl SourceState {
    /// Record a successful poll. Returns the previous health if the state kind changed.
    pub fn record_success(&mut self) -> Option<SourceHealth> {
        self.consecutive_failures = 0;
        self.last_success = Some(Utc::now());
        self.last_error = None;
        self.transition(SourceHealth::Healthy)
    }

    /// Record a failed poll. Returns the previous health if the state kind changed.
    pub fn record_failure(&mut self, error: String, threshold: u32) -> Option<SourceHealth> {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error);
        let next = if self.consecutive_failures >= threshold {
            SourceHealth::Offline
        } else {
            SourceHealth::Degraded(self.consecutive_failures)
        };
        self.transition(next)
    }

    fn transition(&mut self, next: SourceHealth) -> Option<SourceHealth> {
        let previous = mem::replace(&mut self.health, next);
        (mem::discriminant(&previous) != mem::discriminant(&next)).then_some(previous)
    }
}

/// Current stats timer configuration, shared with the stats loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub auto_refresh: bool,
    pub interval: Duration,
}

/// Mutable poller state. Only the poll operations and settings changes touch it.
#[derive(Debug, Clone, Serialize)]
pub struct PollerState {
    pub stats: SourceState,
    pub regions: SourceState,
    pub lag_sources: SourceState,
    pub offline_overlay_visible: bool,
    /// Last value reported by the regions endpoint
    pub feature_disabled: Option<bool>,
    pub auto_refresh: bool,
    pub refresh_interval_ms: u64,
    /// Sequence number handed to the most recently dispatched stats poll
    pub stats_dispatched: u64,
    /// Sequence number of the snapshot last forwarded to the sink
    pub stats_applied: Option<u64>,
}

impl PollerState {
    pub fn new(auto_refresh: bool, refresh_interval_ms: u64) -> Self {
        Self {
            stats: SourceState::default(),
            regions: SourceState::default(),
            lag_sources: SourceState::default(),
            offline_overlay_visible: false,
            feature_disabled: None,
            auto_refresh,
            refresh_interval_ms,
            stats_dispatched: 0,
            stats_applied: None,
        }
    }

    /// Consecutive stats failures; this counter drives the offline overlay.
    pub fn consecutive_failures(&self) -> u32 {
        self.stats.consecutive_failures
    }

    /// Health accounting for one endpoint.
    pub fn source(&self, source: PollSource) -> &SourceState {
        match source {
            PollSource::Stats => &self.stats,
            PollSource::Regions => &self.regions,
            PollSource::LagSources => &self.lag_sources,
        }
    }

    pub fn schedule(&self) -> RefreshSchedule {
        RefreshSchedule {
            auto_refresh: self.auto_refresh,
            interval: Duration::from_millis(self.refresh_interval_ms),
        }
    }
}
