//! Dashboard presentation layer
//!
//! The poller never draws anything itself. It hands snapshots and overlay
//! transitions to a [`DashboardSink`]; [`DashboardView`] is the in-memory sink
//! the CLI renders from.
//!
//! - Chart windows for TPS/MSPT, memory and players (last 60 points)
//! - Latest stats snapshot and lag-source ranking
//! - Offline and feature-disabled overlay flags

pub mod history;
pub mod types;
pub mod view;

pub use history::SeriesWindow;
pub use types::{Badge, PingLevel};
pub use view::{DashboardView, ViewState};

use crate::client::{LagSourcesSnapshot, StatsSnapshot};

/// Receiver of everything the poller wants shown.
///
/// Implementations must tolerate repeated calls; the poller only guarantees
/// that `show_offline`/`hide_offline` are not called twice in a row.
pub trait DashboardSink: Send + Sync {
    /// A fresh stats snapshot arrived.
    fn render_stats(&self, stats: &StatsSnapshot);

    /// A lag-source ranking arrived (possibly the simulated fallback).
    fn render_lag_sources(&self, report: &LagSourcesSnapshot);

    fn show_offline(&self);

    fn hide_offline(&self);

    /// Toggle the "feature disabled on this server" overlay.
    fn set_feature_disabled(&self, disabled: bool);
}
