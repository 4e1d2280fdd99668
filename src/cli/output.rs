//! Output formatting helpers for CLI commands

use crate::client::{
    LagSourcesSnapshot, PlayerDetail, PlayersSnapshot, RemoteSettings, StatsSnapshot,
};
use crate::dashboard::types::{format_mspt, format_ping, format_tps};
use crate::dashboard::{Badge, PingLevel, SeriesWindow, ViewState};
use crate::poller::{PollSource, PollerState, SourceHealth};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// View model for stats display
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    pub tps: Option<f64>,
    pub tps_badge: Badge,
    pub mspt: Option<f64>,
    pub mspt_badge: Badge,
    pub players: u32,
    pub player_list: Vec<PlayerView>,
    pub entities: i64,
    pub chunks: i64,
    pub memory_used_mb: u64,
    pub memory_max_mb: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub ping: Option<i64>,
    pub ping_level: PingLevel,
}

impl From<&StatsSnapshot> for StatsView {
    fn from(stats: &StatsSnapshot) -> Self {
        let tps = stats.effective_tps();
        let mspt = stats.valid_mspt();
        Self {
            tps,
            tps_badge: Badge::for_tps(tps),
            mspt,
            mspt_badge: Badge::for_mspt(mspt),
            players: stats.players,
            player_list: stats
                .player_list
                .iter()
                .map(|p| PlayerView {
                    name: display_name(&p.name),
                    ping: p.ping,
                    ping_level: PingLevel::classify(p.ping),
                })
                .collect(),
            entities: stats.entities,
            chunks: stats.chunks,
            memory_used_mb: stats.memory.used,
            memory_max_mb: stats.memory.max,
        }
    }
}

fn display_name(name: &str) -> String {
    if name.is_empty() {
        "Unknown".to_string()
    } else {
        name.to_string()
    }
}

/// Colour a badge label
pub fn badge_colored(badge: Badge) -> ColoredString {
    match badge {
        Badge::Excellent => badge.label().green(),
        Badge::Good => badge.label().cyan(),
        Badge::Warning => badge.label().yellow(),
        Badge::Critical => badge.label().red(),
        Badge::NotAvailable => badge.label().dimmed(),
    }
}

fn tps_colored(tps: Option<f64>) -> ColoredString {
    let text = format_tps(tps);
    match Badge::for_tps(tps) {
        Badge::Excellent => text.green(),
        Badge::NotAvailable => text.dimmed(),
        _ => text.red(),
    }
}

fn ping_colored(ping: Option<i64>) -> ColoredString {
    let text = format_ping(ping);
    match PingLevel::classify(ping) {
        PingLevel::Good => text.green(),
        PingLevel::Elevated => text.yellow(),
        PingLevel::High => text.red(),
        PingLevel::Unknown => text.normal(),
    }
}

fn health_colored(health: SourceHealth) -> ColoredString {
    match health {
        SourceHealth::Unknown => "Unknown".yellow(),
        SourceHealth::Healthy => "Healthy".green(),
        SourceHealth::Degraded(n) => format!("Degraded ({} failures)", n).yellow(),
        SourceHealth::Offline => "Offline".red(),
    }
}

/// Render a series as an 8-level sparkline; gaps are blank.
pub fn sparkline(values: &[Option<f64>]) -> String {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let (Some(min), Some(max)) = (
        present.iter().copied().reduce(f64::min),
        present.iter().copied().reduce(f64::max),
    ) else {
        return String::new();
    };

    let range = max - min;
    values
        .iter()
        .map(|v| match v {
            None => ' ',
            Some(_) if range <= f64::EPSILON => SPARK_LEVELS[3],
            Some(v) => {
                let level = ((v - min) / range * 7.0).round() as usize;
                SPARK_LEVELS[level.min(7)]
            }
        })
        .collect()
}

fn stats_table(view: &StatsView) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Metric", "Value", "Status"]);

    table.add_row(vec![
        Cell::new("TPS"),
        Cell::new(tps_colored(view.tps)),
        Cell::new(badge_colored(view.tps_badge)),
    ]);
    table.add_row(vec![
        Cell::new("MSPT"),
        Cell::new(format_mspt(view.mspt)),
        Cell::new(badge_colored(view.mspt_badge)),
    ]);
    table.add_row(vec![
        Cell::new("Players"),
        Cell::new(view.players),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Entities"),
        Cell::new(view.entities),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Chunks"),
        Cell::new(view.chunks),
        Cell::new(""),
    ]);
    table.add_row(vec![
        Cell::new("Memory"),
        Cell::new(format!("{}/{} MB", view.memory_used_mb, view.memory_max_mb)),
        Cell::new(""),
    ]);

    table
}

fn player_lines(players: &[PlayerView]) -> String {
    if players.is_empty() {
        return "No players online".dimmed().to_string();
    }
    players
        .iter()
        .map(|p| format!("{} {}", p.name, ping_colored(p.ping)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format stats as tables
pub fn format_stats_table(stats: &StatsSnapshot) -> String {
    let view = StatsView::from(stats);
    format!(
        "{}\n\nPlayers:\n{}",
        stats_table(&view),
        player_lines(&view.player_list)
    )
}

/// Format stats as JSON
pub fn format_stats_json(stats: &StatsSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StatsView::from(stats))
}

fn lag_table(report: &LagSourcesSnapshot) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#",
        "Region",
        "MSPT",
        "TPS",
        "Cause",
        "Entities",
        "Tile Entities",
    ]);

    for (idx, source) in report.lag_sources.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(if source.region.is_empty() {
                "unknown"
            } else {
                source.region.as_str()
            }),
            Cell::new(
                source
                    .mspt
                    .map(|m| format!("{:.1}ms", m))
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
            Cell::new(source.tps.map(|t| format!("{:.2}", t)).unwrap_or_default()),
            Cell::new(if source.cause.is_empty() {
                "Unknown"
            } else {
                source.cause.as_str()
            }),
            Cell::new(source.entities),
            Cell::new(source.tile_entities),
        ]);
    }

    table
}

/// Format lag sources (and plugin breakdown, when present) as tables
pub fn format_lag_table(report: &LagSourcesSnapshot) -> String {
    let mut output = String::new();

    if report.lag_sources.is_empty() {
        writeln!(output, "No lag sources detected.").ok();
        return output;
    }

    writeln!(output, "{}", lag_table(report)).ok();
    if report.simulated {
        writeln!(output, "{}", "simulated".italic().dimmed()).ok();
    }

    if let Some(breakdown) = report.plugin_breakdown.as_ref().filter(|b| !b.is_empty()) {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Plugin", "Share"]);
        for share in breakdown {
            table.add_row(vec![
                Cell::new(&share.plugin),
                Cell::new(format!("{:.1}%", share.percent)),
            ]);
        }
        writeln!(output).ok();
        writeln!(output, "Top CPU Consumers (sampling):").ok();
        writeln!(output, "{}", table).ok();
    }

    output
}

/// Format lag sources as JSON
pub fn format_lag_json(report: &LagSourcesSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Format players as a table
pub fn format_players_table(players: &PlayersSnapshot) -> String {
    if players.players.is_empty() {
        return "No players online".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Ping", "World", "Position"]);

    for PlayerDetail {
        name,
        ping,
        world,
        x,
        y,
        z,
        ..
    } in &players.players
    {
        table.add_row(vec![
            Cell::new(display_name(name)),
            Cell::new(ping_colored(*ping)),
            Cell::new(world),
            Cell::new(format!("{}, {}, {}", x, y, z)),
        ]);
    }

    table.to_string()
}

/// Format players as JSON
pub fn format_players_json(players: &PlayersSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(players)
}

fn on_off(value: Option<bool>) -> String {
    match value {
        Some(true) => "enabled".green().to_string(),
        Some(false) => "disabled".yellow().to_string(),
        None => "unset".dimmed().to_string(),
    }
}

/// Format backend settings as text
pub fn format_settings(settings: &RemoteSettings) -> String {
    let mut output = String::new();
    writeln!(output, "Auto refresh: {}", on_off(settings.auto_refresh)).ok();
    match settings.refresh_interval {
        Some(secs) => writeln!(output, "Refresh interval: {}s", secs).ok(),
        None => writeln!(output, "Refresh interval: {}", "unset".dimmed()).ok(),
    };
    writeln!(
        output,
        "Admin token required: {}",
        if settings.requires_admin_token == Some(true) {
            "yes"
        } else {
            "no"
        }
    )
    .ok();
    output
}

/// Format backend settings as JSON
pub fn format_settings_json(settings: &RemoteSettings) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "autoRefresh": settings.auto_refresh,
        "refreshInterval": settings.refresh_interval,
        "requiresAdminToken": settings.requires_admin_token.unwrap_or(false),
    }))
}

fn chart_line(output: &mut String, window: &SeriesWindow, index: usize, unit: &str) {
    let name = window.names().get(index).map(String::as_str).unwrap_or("");
    let latest = window
        .latest(index)
        .map(|v| format!("{:.1}{}", v, unit))
        .unwrap_or_else(|| "n/a".to_string());
    writeln!(
        output,
        "{:<18} {} {}",
        name,
        sparkline(&window.values(index)),
        latest
    )
    .ok();
}

/// Format one full dashboard frame
pub fn format_dashboard(view: &ViewState, state: &PollerState, url: &str) -> String {
    let mut output = String::new();

    writeln!(output, "{} {}", "tickwatch".bold(), url.dimmed()).ok();

    if view.offline {
        writeln!(output).ok();
        writeln!(output, "{}", "Server Currently Down!".red().bold()).ok();
        writeln!(
            output,
            "Unable to connect to the server. Waiting for a server to report back..."
        )
        .ok();
        return output;
    }

    if view.feature_disabled {
        writeln!(output).ok();
        writeln!(
            output,
            "{}",
            "This feature is disabled on Folia servers!".yellow().bold()
        )
        .ok();
        writeln!(
            output,
            "Server-wide stats are not available on multithreaded region servers."
        )
        .ok();
        return output;
    }

    let refresh = if state.auto_refresh {
        format!("every {}s", state.refresh_interval_ms / 1000)
    } else {
        "paused".to_string()
    };
    let updated = view
        .updated_at
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let sources = [PollSource::Stats, PollSource::Regions, PollSource::LagSources]
        .iter()
        .map(|source| {
            format!(
                "{}: {}",
                source.as_str(),
                health_colored(state.source(*source).health)
            )
        })
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(output, "Refresh: {}  Updated: {}", refresh, updated).ok();
    writeln!(output, "Sources: {}", sources).ok();
    writeln!(output).ok();

    match &view.stats {
        Some(stats) => {
            let stats_view = StatsView::from(stats);
            writeln!(output, "{}", stats_table(&stats_view)).ok();
            writeln!(output).ok();
            writeln!(output, "{}", player_lines(&stats_view.player_list)).ok();
        }
        None => {
            writeln!(output, "{}", "Waiting for first stats snapshot...".dimmed()).ok();
        }
    }

    writeln!(output).ok();
    chart_line(&mut output, &view.tps_chart, 0, "");
    chart_line(&mut output, &view.tps_chart, 1, "ms");
    chart_line(&mut output, &view.memory_chart, 0, " MB");
    chart_line(&mut output, &view.players_chart, 0, "");

    if let Some(report) = &view.lag_sources {
        writeln!(output).ok();
        writeln!(output, "Lag Sources:").ok();
        output.push_str(&format_lag_table(report));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MemoryUsage, PlayerEntry};
    use crate::dashboard::{DashboardSink, DashboardView};
    use crate::poller::simulated_lag_sources;

    fn create_test_stats() -> StatsSnapshot {
        StatsSnapshot {
            tps: Some(20.0),
            mspt: Some(100.0),
            players: 2,
            player_list: vec![
                PlayerEntry {
                    name: "alex".to_string(),
                    ping: Some(42),
                },
                PlayerEntry {
                    name: String::new(),
                    ping: None,
                },
            ],
            entities: 321,
            chunks: 876,
            regions: 1,
            memory: MemoryUsage {
                used: 1500,
                max: 4096,
            },
        }
    }

    #[test]
    fn test_stats_view_derives_badges() {
        let view = StatsView::from(&create_test_stats());
        assert_eq!(view.tps, Some(10.0));
        assert_eq!(view.tps_badge, Badge::Critical);
        assert_eq!(view.mspt_badge, Badge::Critical);
        assert_eq!(view.player_list[1].name, "Unknown");
        assert_eq!(view.player_list[1].ping_level, PingLevel::Unknown);
    }

    #[test]
    fn test_format_stats_table_with_data() {
        let output = format_stats_table(&create_test_stats());
        assert!(output.contains("TPS"));
        assert!(output.contains("10.00"));
        assert!(output.contains("100.00ms"));
        assert!(output.contains("1500/4096 MB"));
        assert!(output.contains("alex"));
    }

    #[test]
    fn test_format_stats_table_no_players() {
        let stats = StatsSnapshot::default();
        let output = format_stats_table(&stats);
        assert!(output.contains("No players online"));
        assert!(output.contains("n/a"));
    }

    #[test]
    fn test_format_stats_json_valid() {
        let output = format_stats_json(&create_test_stats()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["tps"], 10.0);
        assert_eq!(parsed["tps_badge"], "critical");
        assert_eq!(parsed["memory_max_mb"], 4096);
    }

    #[test]
    fn test_format_lag_table_simulated() {
        let output = format_lag_table(&simulated_lag_sources());
        assert!(output.contains("world_spawn"));
        assert!(output.contains("83.2ms"));
        assert!(output.contains("simulated"));
        assert!(!output.contains("Top CPU Consumers"));
    }

    #[test]
    fn test_format_lag_table_breakdown() {
        let mut report = simulated_lag_sources();
        report.simulated = false;
        report.plugin_breakdown = Some(vec![crate::client::PluginShare {
            plugin: "WorldEdit".to_string(),
            percent: 12.5,
            samples: Some(1),
        }]);
        let output = format_lag_table(&report);
        assert!(output.contains("Top CPU Consumers"));
        assert!(output.contains("WorldEdit"));
        assert!(output.contains("12.5%"));
    }

    #[test]
    fn test_format_lag_table_empty() {
        let output = format_lag_table(&LagSourcesSnapshot::default());
        assert!(output.contains("No lag sources detected."));
    }

    #[test]
    fn test_format_players_table() {
        let players = PlayersSnapshot {
            players: vec![PlayerDetail {
                name: "steve".to_string(),
                uuid: "00000000-0000-0000-0000-000000000001".to_string(),
                ping: Some(320),
                world: "world_nether".to_string(),
                x: 10,
                y: 64,
                z: -3,
            }],
        };
        let output = format_players_table(&players);
        assert!(output.contains("steve"));
        assert!(output.contains("320ms"));
        assert!(output.contains("10, 64, -3"));
    }

    #[test]
    fn test_format_settings() {
        let settings = RemoteSettings {
            auto_refresh: Some(true),
            refresh_interval: Some(5),
            requires_admin_token: Some(true),
        };
        let output = format_settings(&settings);
        assert!(output.contains("enabled"));
        assert!(output.contains("5s"));
        assert!(output.contains("Admin token required: yes"));

        let json: serde_json::Value =
            serde_json::from_str(&format_settings_json(&settings).unwrap()).unwrap();
        assert_eq!(json["refreshInterval"], 5);
    }

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[None, None]), "");
        assert_eq!(sparkline(&[Some(0.0), Some(7.0)]), "▁█");
        assert_eq!(sparkline(&[Some(5.0), None, Some(5.0)]), "▄ ▄");
    }

    #[test]
    fn test_format_dashboard_offline() {
        let view = DashboardView::default();
        view.render_stats(&create_test_stats());
        view.show_offline();
        let state = PollerState::new(true, 2000);

        let output = format_dashboard(&view.snapshot(), &state, "http://localhost:8080");
        assert!(output.contains("Server Currently Down!"));
        assert!(!output.contains("Memory"));
    }

    #[test]
    fn test_format_dashboard_feature_disabled() {
        let view = DashboardView::default();
        view.set_feature_disabled(true);
        let state = PollerState::new(true, 2000);

        let output = format_dashboard(&view.snapshot(), &state, "http://localhost:8080");
        assert!(output.contains("disabled on Folia"));
    }

    #[test]
    fn test_format_dashboard_full_frame() {
        let view = DashboardView::default();
        view.render_stats(&create_test_stats());
        view.render_lag_sources(&simulated_lag_sources());
        let state = PollerState::new(false, 5000);

        let output = format_dashboard(&view.snapshot(), &state, "http://localhost:8080");
        assert!(output.contains("paused"));
        assert!(output.contains("1500/4096 MB"));
        assert!(output.contains("Used Memory (MB)"));
        assert!(output.contains("Lag Sources:"));
        assert!(output.contains("village_1"));
    }

    #[test]
    fn test_format_dashboard_waiting() {
        let view = DashboardView::default();
        let state = PollerState::new(true, 2000);
        let output = format_dashboard(&view.snapshot(), &state, "http://localhost:8080");
        assert!(output.contains("Waiting for first stats snapshot"));
        assert!(output.contains("every 2s"));
    }

    #[test]
    fn test_format_dashboard_lists_every_source() {
        let view = DashboardView::default();
        let mut state = PollerState::new(true, 2000);
        state.regions.record_failure("HTTP error: 404".to_string(), 3);
        state.lag_sources.record_success();

        let output = format_dashboard(&view.snapshot(), &state, "http://localhost:8080");
        assert!(output.contains("Sources:"));
        assert!(output.contains("stats: "));
        assert!(output.contains("Degraded (1 failures)"));
        assert!(output.contains("lag_sources: "));
        assert!(output.contains("Healthy"));
    }
}
