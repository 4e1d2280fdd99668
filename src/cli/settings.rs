//! `settings show` / `settings set` handlers

use crate::cli::output::{format_settings, format_settings_json};
use crate::cli::{QueryArgs, SettingsSetArgs};
use crate::client::{DashboardApi, SettingsUpdate};
use crate::config::TickwatchConfig;
use std::sync::Arc;

/// Handle `tickwatch settings show`
pub async fn handle_settings_show(
    args: &QueryArgs,
    api: Arc<dyn DashboardApi>,
) -> Result<String, Box<dyn std::error::Error>> {
    let settings = api.fetch_settings().await?;

    if args.json {
        Ok(format_settings_json(&settings)?)
    } else {
        Ok(format_settings(&settings))
    }
}

/// Build the update to post; the token falls back to `server.admin_token`.
pub fn build_update(args: &SettingsSetArgs, config: &TickwatchConfig) -> SettingsUpdate {
    SettingsUpdate {
        auto_refresh: args.auto_refresh,
        refresh_interval: args.interval,
        admin_token: args
            .admin_token
            .clone()
            .or_else(|| config.server.admin_token.clone()),
    }
}

/// Handle `tickwatch settings set`
pub async fn handle_settings_set(
    args: &SettingsSetArgs,
    config: &TickwatchConfig,
    api: Arc<dyn DashboardApi>,
) -> Result<String, Box<dyn std::error::Error>> {
    if args.auto_refresh.is_none() && args.interval.is_none() {
        return Err("Nothing to change. Pass --auto-refresh and/or --interval.".into());
    }

    let update = build_update(args, config);
    let ack = api.post_settings(&update).await?;
    tracing::info!(
        auto_refresh = ?update.auto_refresh,
        refresh_interval = ?update.refresh_interval,
        "Settings posted"
    );

    let mut message = String::from("✓ Settings updated");
    if !ack.is_null() {
        message.push('\n');
        message.push_str(&serde_json::to_string_pretty(&ack)?);
    }
    Ok(message)
}
