//! One-shot query commands: `stats`, `lag`, `players`

use crate::cli::output::{
    format_lag_json, format_lag_table, format_players_json, format_players_table,
    format_stats_json, format_stats_table,
};
use crate::cli::QueryArgs;
use crate::client::DashboardApi;
use crate::dashboard::DashboardView;
use crate::poller::{Poller, PollerConfig};
use std::sync::Arc;

/// Handle `tickwatch stats`
pub async fn handle_stats(
    args: &QueryArgs,
    api: Arc<dyn DashboardApi>,
) -> Result<String, Box<dyn std::error::Error>> {
    let stats = api.fetch_stats().await?;

    if args.json {
        Ok(format_stats_json(&stats)?)
    } else {
        Ok(format_stats_table(&stats))
    }
}

/// Handle `tickwatch lag`
///
/// Goes through the poller so an unreachable backend or an empty ranking
/// yields the simulated ranking, exactly as the live dashboard shows it.
pub async fn handle_lag(
    args: &QueryArgs,
    api: Arc<dyn DashboardApi>,
) -> Result<String, Box<dyn std::error::Error>> {
    let poller = Poller::new(api, Arc::new(DashboardView::default()), PollerConfig::default());
    let report = poller.poll_lag_sources().await;

    if args.json {
        Ok(format_lag_json(&report)?)
    } else {
        Ok(format_lag_table(&report))
    }
}

/// Handle `tickwatch players`
pub async fn handle_players(
    args: &QueryArgs,
    api: Arc<dyn DashboardApi>,
) -> Result<String, Box<dyn std::error::Error>> {
    let players = api.fetch_players().await?;

    if args.json {
        Ok(format_players_json(&players)?)
    } else {
        Ok(format_players_table(&players))
    }
}
