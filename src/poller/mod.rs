//! Polling module for dashboard backend monitoring.
//!
//! The [`Poller`] fetches the stats, regions and lag-source endpoints on
//! independent timers, tracks consecutive failures, and forwards results to a
//! [`DashboardSink`]. Poll failures never escape a poll operation: they become
//! failure counts, the simulated lag-source fallback, or are ignored.

mod config;
mod error;
mod fallback;
mod state;


pub use config::*;
pub use error::*;
pub use fallback::simulated_lag_sources;
pub use state::*;

use crate::client::{
    DashboardApi, LagSourcesSnapshot, PollError, RemoteSettings, Settings, SettingsUpdate,
};
use crate::dashboard::DashboardSink;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Smallest accepted stats period.
pub const MIN_INTERVAL_MS: u64 = 1000;

/// Background service that polls a dashboard backend.
pub struct Poller {
    /// Backend API
    api: Arc<dyn DashboardApi>,
    /// Where snapshots and overlay changes go
    sink: Arc<dyn DashboardSink>,
    config: PollerConfig,
    state: Mutex<PollerState>,
    /// Stats timer configuration; the stats loop reinstalls its timer on change
    schedule: watch::Sender<RefreshSchedule>,
}

impl Poller {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        sink: Arc<dyn DashboardSink>,
        config: PollerConfig,
    ) -> Self {
        let interval_ms = config
            .refresh_interval_seconds
            .saturating_mul(1000)
            .max(MIN_INTERVAL_MS);
        let state = PollerState::new(config.auto_refresh, interval_ms);
        let (schedule, _) = watch::channel(state.schedule());

        Self {
            api,
            sink,
            config,
            state: Mutex::new(state),
            schedule,
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Copy of the current state.
    pub fn state(&self) -> PollerState {
        self.lock_state().clone()
    }

    /// Current stats timer configuration.
    pub fn schedule(&self) -> RefreshSchedule {
        *self.schedule.borrow()
    }

    fn lock_state(&self) -> MutexGuard<'_, PollerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Poll `/api/stats` once.
    ///
    /// Success resets the failure counter, hides the offline overlay and
    /// renders the snapshot. Failure increments the counter and shows the
    /// overlay once the threshold is reached.
    pub async fn poll_stats(&self) -> Result<(), PollError> {
        let seq = {
            let mut state = self.lock_state();
            state.stats_dispatched += 1;
            state.stats_dispatched
        };

        let result = self.api.fetch_stats().await;

        // Sink calls happen after the state lock is released.
        let mut hide_offline = false;
        let mut show_offline = false;
        let mut snapshot = None;

        let outcome = {
            let mut state = self.lock_state();
            match result {
                Ok(stats) => {
                    record_outcome(PollSource::Stats, "success");
                    if let Some(previous) = state.stats.record_success() {
                        tracing::info!(
                            source = PollSource::Stats.as_str(),
                            old_status = ?previous,
                            new_status = ?state.stats.health,
                            "Source status changed"
                        );
                    }
                    if state.offline_overlay_visible {
                        state.offline_overlay_visible = false;
                        hide_offline = true;
                        tracing::info!("Backend reachable again, hiding offline overlay");
                    }

                    if state.stats_applied.is_some_and(|applied| seq < applied) {
                        tracing::debug!(
                            seq,
                            applied = ?state.stats_applied,
                            "Discarding out-of-order stats snapshot"
                        );
                    } else {
                        state.stats_applied = Some(seq);
                        tracing::debug!(
                            seq,
                            tps = ?stats.effective_tps(),
                            players = stats.players,
                            "Stats snapshot applied"
                        );
                        snapshot = Some(stats);
                    }
                    Ok(())
                }
                Err(error) => {
                    record_outcome(PollSource::Stats, error.kind());
                    let threshold = self.config.failure_threshold;
                    if let Some(previous) =
                        state.stats.record_failure(error.to_string(), threshold)
                    {
                        tracing::info!(
                            source = PollSource::Stats.as_str(),
                            old_status = ?previous,
                            new_status = ?state.stats.health,
                            "Source status changed"
                        );
                    }
                    let failures = state.consecutive_failures();
                    tracing::warn!(
                        error = %error,
                        consecutive_failures = failures,
                        "Failed to fetch stats"
                    );

                    if failures >= threshold && !state.offline_overlay_visible {
                        state.offline_overlay_visible = true;
                        show_offline = true;
                        tracing::warn!(consecutive_failures = failures, "Backend offline");
                    }
                    Err(error)
                }
            }
        };

        if hide_offline {
            self.sink.hide_offline();
        }
        if let Some(stats) = &snapshot {
            self.sink.render_stats(stats);
        }
        if show_offline {
            self.sink.show_offline();
        }
        outcome
    }

    /// Poll `/api/regions` once and toggle the feature-disabled overlay.
    ///
    /// Failures leave the overlay as it was and never count towards offline detection.
    pub async fn poll_regions(&self) -> Result<bool, PollError> {
        let result = self.api.fetch_regions().await;

        {
            let mut state = self.lock_state();
            match &result {
                Ok(regions) => {
                    record_outcome(PollSource::Regions, "success");
                    state.regions.record_success();
                    if state.feature_disabled != Some(regions.is_folia) {
                        tracing::info!(
                            disabled = regions.is_folia,
                            "Feature-disabled overlay toggled"
                        );
                    }
                    state.feature_disabled = Some(regions.is_folia);
                }
                Err(error) => {
                    record_outcome(PollSource::Regions, error.kind());
                    state
                        .regions
                        .record_failure(error.to_string(), self.config.failure_threshold);
                    tracing::warn!(error = %error, "Failed to fetch regions");
                }
            }
        }

        let is_folia = result?.is_folia;
        self.sink.set_feature_disabled(is_folia);
        Ok(is_folia)
    }

    /// Poll `/api/lag-sources` once and render the result.
    ///
    /// A failed request or an empty list renders [`simulated_lag_sources`]
    /// instead, so the ranking is never blank. Returns what was rendered.
    pub async fn poll_lag_sources(&self) -> LagSourcesSnapshot {
        let result = self.api.fetch_lag_sources().await;

        let report = {
            let mut state = self.lock_state();
            match result {
                Ok(snapshot) if !snapshot.lag_sources.is_empty() => {
                    record_outcome(PollSource::LagSources, "success");
                    state.lag_sources.record_success();
                    snapshot
                }
                Ok(_) => {
                    record_outcome(PollSource::LagSources, "empty");
                    state.lag_sources.record_success();
                    tracing::debug!("No lag sources reported, using simulated data");
                    simulated_lag_sources()
                }
                Err(error) => {
                    record_outcome(PollSource::LagSources, error.kind());
                    state
                        .lag_sources
                        .record_failure(error.to_string(), self.config.failure_threshold);
                    tracing::warn!(
                        error = %error,
                        "Failed to fetch lag sources, using simulated data"
                    );
                    simulated_lag_sources()
                }
            }
        };

        self.sink.render_lag_sources(&report);
        report
    }

    /// Change the stats period.
    ///
    /// The stats loop drops its current timer and installs one at the new
    /// period; the first poll happens one full period later.
    pub fn set_interval(&self, interval_ms: u64) -> Result<(), PollerError> {
        if interval_ms < MIN_INTERVAL_MS {
            return Err(PollerError::InvalidInterval(interval_ms));
        }

        let mut state = self.lock_state();
        state.refresh_interval_ms = interval_ms;
        let schedule = state.schedule();
        self.schedule.send_replace(schedule);
        tracing::info!(interval_ms, "Stats refresh interval changed");
        Ok(())
    }

    /// Apply refresh settings. Absent fields are left unchanged.
    ///
    /// Disabling an already disabled timer does nothing; an interval below one
    /// second is ignored.
    pub fn apply_settings(&self, settings: &Settings) {
        if let Some(seconds) = settings.refresh_interval {
            if let Err(e) = self.set_interval(seconds.saturating_mul(1000)) {
                tracing::warn!(error = %e, seconds, "Ignoring invalid refresh interval");
            }
        }

        if let Some(enabled) = settings.auto_refresh {
            let mut state = self.lock_state();
            if state.auto_refresh != enabled {
                state.auto_refresh = enabled;
                let schedule = state.schedule();
                self.schedule.send_replace(schedule);
                tracing::info!(enabled, "Stats auto-refresh toggled");
            }
        }
    }

    /// Fetch `/api/settings` and apply it. Failures are logged and ignored.
    pub async fn sync_settings(&self) -> Option<RemoteSettings> {
        match self.api.fetch_settings().await {
            Ok(remote) => {
                self.apply_settings(&remote.to_settings());
                Some(remote)
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to fetch settings");
                None
            }
        }
    }

    /// Post a settings change, then apply it locally whether or not the post succeeded.
    pub async fn update_settings(&self, update: &SettingsUpdate) -> Option<serde_json::Value> {
        let ack = match self.api.post_settings(update).await {
            Ok(ack) => Some(ack),
            Err(error) => {
                tracing::warn!(error = %error, "Failed to post settings");
                None
            }
        };
        self.apply_settings(&update.to_settings());
        ack
    }

    /// Start the poll loops in a background task.
    ///
    /// Every source is polled once immediately; afterwards stats follow the
    /// refresh schedule while regions and lag sources use fixed periods.
    /// The returned handle resolves once `cancel_token` fires.
    pub fn start(self: Arc<Self>, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let schedule = self.schedule();
            tracing::info!(
                auto_refresh = schedule.auto_refresh,
                interval_ms = schedule.interval.as_millis() as u64,
                "Poller started"
            );

            let this: &Poller = &self;

            tokio::select! {
                biased;
                _ = cancel_token.cancelled() => {
                    tracing::info!("Poller cancelled during initial poll");
                    return;
                }
                _ = async {
                    tokio::join!(this.poll_stats(), this.poll_regions(), this.poll_lag_sources())
                } => {}
            }

            tokio::join!(
                this.run_stats_loop(cancel_token.clone()),
                run_fixed_loop(
                    PollSource::Regions,
                    this.config.regions_interval(),
                    cancel_token.clone(),
                    move || async move {
                        let _ = this.poll_regions().await;
                    }
                ),
                run_fixed_loop(
                    PollSource::LagSources,
                    this.config.lag_sources_interval(),
                    cancel_token.clone(),
                    move || async move {
                        this.poll_lag_sources().await;
                    }
                ),
            );

            tracing::info!("Poller shutting down");
        })
    }

    async fn run_stats_loop(&self, cancel_token: CancellationToken) {
        let mut schedule_rx = self.schedule.subscribe();

        loop {
            let schedule = *schedule_rx.borrow_and_update();

            if !schedule.auto_refresh {
                tracing::debug!("Stats timer idle");
                tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => return,
                    changed = schedule_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        continue;
                    }
                }
            }

            let mut interval = repeating(schedule.interval);
            tracing::debug!(
                interval_ms = schedule.interval.as_millis() as u64,
                "Stats timer installed"
            );

            loop {
                tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => return,
                    changed = schedule_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        break;
                    }
                    _ = interval.tick() => {
                        // An in-flight poll must not hold up shutdown.
                        tokio::select! {
                            biased;
                            _ = cancel_token.cancelled() => return,
                            _ = self.poll_stats() => {}
                        }
                    }
                }
            }
        }
    }
}

/// Run `poll` every `period` until cancelled. The first poll is one period away.
async fn run_fixed_loop<F, Fut>(
    source: PollSource,
    period: Duration,
    cancel_token: CancellationToken,
    poll: F,
) where
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut interval = repeating(period);
    tracing::debug!(
        source = source.as_str(),
        period_ms = period.as_millis() as u64,
        "Fixed poll timer installed"
    );

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    _ = cancel_token.cancelled() => break,
                    _ = poll() => {}
                }
            }
        }
    }
}

/// Interval whose first tick is one period away, like `setInterval`.
fn repeating(period: Duration) -> tokio::time::Interval {
    let period = period.max(Duration::from_millis(MIN_INTERVAL_MS));
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

fn record_outcome(source: PollSource, outcome: &'static str) {
    metrics::counter!(
        "tickwatch_polls_total",
        "source" => source.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
