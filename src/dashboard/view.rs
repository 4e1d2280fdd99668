//! In-memory dashboard state fed by the poller.

use std::sync::RwLock;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::history::SeriesWindow;
use super::DashboardSink;
use crate::client::{LagSourcesSnapshot, StatsSnapshot};

/// Everything needed to draw one dashboard frame.
#[derive(Debug, Clone, Serialize)]
pub struct ViewState {
    pub stats: Option<StatsSnapshot>,
    /// Effective TPS and MSPT
    pub tps_chart: SeriesWindow,
    /// Used memory in MB
    pub memory_chart: SeriesWindow,
    /// Players online
    pub players_chart: SeriesWindow,
    pub lag_sources: Option<LagSourcesSnapshot>,
    pub offline: bool,
    pub feature_disabled: bool,
    pub updated_at: Option<DateTime<Local>>,
}

impl ViewState {
    fn new(capacity: usize) -> Self {
        Self {
            stats: None,
            tps_chart: SeriesWindow::new(["TPS", "MSPT"], capacity),
            memory_chart: SeriesWindow::new(["Used Memory (MB)"], capacity),
            players_chart: SeriesWindow::new(["Players Online"], capacity),
            lag_sources: None,
            offline: false,
            feature_disabled: false,
            updated_at: None,
        }
    }
}

/// Thread-safe [`DashboardSink`] that keeps the latest frame in memory.
pub struct DashboardView {
    state: RwLock<ViewState>,
}

impl DashboardView {
    /// Creates an empty view whose charts retain `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: RwLock::new(ViewState::new(capacity)),
        }
    }

    /// Copy of the current frame.
    pub fn snapshot(&self) -> ViewState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut state);
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new(super::history::DEFAULT_CAPACITY)
    }
}

impl DashboardSink for DashboardView {
    fn render_stats(&self, stats: &StatsSnapshot) {
        let now = Local::now();
        let label = now.format("%H:%M:%S").to_string();
        let tps = stats.effective_tps();
        let mspt = stats.valid_mspt();

        self.update(|state| {
            state.tps_chart.push(label.clone(), &[tps, mspt]);
            state
                .memory_chart
                .push(label.clone(), &[Some(stats.memory.used as f64)]);
            state
                .players_chart
                .push(label, &[Some(stats.players as f64)]);
            state.stats = Some(stats.clone());
            state.updated_at = Some(now);
        });
    }

    fn render_lag_sources(&self, report: &LagSourcesSnapshot) {
        self.update(|state| state.lag_sources = Some(report.clone()));
    }

    fn show_offline(&self) {
        self.update(|state| state.offline = true);
    }

    fn hide_offline(&self) {
        self.update(|state| state.offline = false);
    }

    fn set_feature_disabled(&self, disabled: bool) {
        self.update(|state| state.feature_disabled = disabled);
    }
}
