//! Wire types for the dashboard API.
//!
//! The backend emits camelCase JSON and is loose about absent fields, so every
//! collection and counter defaults when missing.

use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on displayed TPS; a server never ticks faster than this.
pub const MAX_TPS: f64 = 20.0;

/// Compute the TPS shown to users.
///
/// A positive MSPT is authoritative (`1000 / mspt`, clamped to [`MAX_TPS`]);
/// otherwise the raw TPS is used when it is a finite number.
pub fn effective_tps(mspt: Option<f64>, tps: Option<f64>) -> Option<f64> {
    match mspt {
        Some(ms) if ms.is_finite() && ms > 0.0 => Some(MAX_TPS.min(1000.0 / ms.max(0.0001))),
        _ => tps.filter(|t| t.is_finite()),
    }
}

/// Snapshot returned by `GET /api/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsSnapshot {
    pub tps: Option<f64>,
    pub mspt: Option<f64>,
    pub players: u32,
    pub player_list: Vec<PlayerEntry>,
    pub entities: i64,
    pub chunks: i64,
    pub regions: u32,
    pub memory: MemoryUsage,
}

impl StatsSnapshot {
    /// Effective TPS for this snapshot, see [`effective_tps`].
    pub fn effective_tps(&self) -> Option<f64> {
        effective_tps(self.mspt, self.tps)
    }

    /// MSPT when it is usable for display and charting.
    pub fn valid_mspt(&self) -> Option<f64> {
        self.mspt.filter(|ms| ms.is_finite() && *ms >= 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerEntry {
    pub name: String,
    pub ping: Option<i64>,
}

/// Heap usage in megabytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryUsage {
    pub used: u64,
    pub max: u64,
}

/// Snapshot returned by `GET /api/regions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionsSnapshot {
    pub is_folia: bool,
    pub regions: Vec<RegionStat>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionStat {
    pub region: String,
    pub mspt: f64,
    pub tps: f64,
}

/// Snapshot returned by `GET /api/lag-sources`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LagSourcesSnapshot {
    pub lag_sources: Vec<LagSource>,
    pub simulated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_breakdown: Option<Vec<PluginShare>>,
}

/// One region ranked as a source of lag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LagSource {
    pub region: String,
    pub tps: Option<f64>,
    pub mspt: Option<f64>,
    pub cause: String,
    pub entities: i64,
    pub tile_entities: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<i64>,
}

/// Sampled share of main-thread time attributed to a plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginShare {
    pub plugin: String,
    pub percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<u32>,
}

/// Response of `GET /api/players`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayersSnapshot {
    pub players: Vec<PlayerDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerDetail {
    pub name: String,
    pub uuid: String,
    pub ping: Option<i64>,
    pub world: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Response of `GET /api/settings`.
///
/// The backend echoes its YAML file, so booleans and numbers may arrive as
/// strings. Unparseable values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSettings {
    #[serde(deserialize_with = "lenient_bool")]
    pub auto_refresh: Option<bool>,
    #[serde(deserialize_with = "lenient_u64")]
    pub refresh_interval: Option<u64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub requires_admin_token: Option<bool>,
}

impl RemoteSettings {
    /// Settings the poller should apply locally.
    pub fn to_settings(&self) -> Settings {
        Settings {
            auto_refresh: self.auto_refresh,
            refresh_interval: self.refresh_interval,
        }
    }
}

/// Local refresh settings; `None` fields are left unchanged when applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_refresh: Option<bool>,
    /// Seconds between stats polls
    pub refresh_interval: Option<u64>,
}

/// Body of `POST /api/settings`, sent form-encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_refresh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

impl SettingsUpdate {
    pub fn to_settings(&self) -> Settings {
        Settings {
            auto_refresh: self.auto_refresh,
            refresh_interval: self.refresh_interval,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    let value: Option<Loose> = Option::deserialize(d)?;
    Ok(match value {
        Some(Loose::Bool(b)) => Some(b),
        Some(Loose::Text(s)) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Whole seconds from a number or numeric string. Fractions are truncated;
/// negative, non-finite or non-numeric values are absent.
fn lenient_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let value: Option<Loose> = Option::deserialize(d)?;
    let seconds = match value {
        Some(Loose::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(whole_seconds)),
        Some(Loose::Text(s)) => s.trim().parse::<f64>().ok().and_then(whole_seconds),
        _ => None,
    };
    Ok(seconds)
}

fn whole_seconds(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_tps_clamped_at_twenty() {
        assert_eq!(effective_tps(Some(50.0), None), Some(20.0));
        assert_eq!(effective_tps(Some(5.0), Some(3.0)), Some(20.0));
    }

    #[test]
    fn test_effective_tps_from_mspt() {
        assert_eq!(effective_tps(Some(100.0), Some(20.0)), Some(10.0));
    }

    #[test]
    fn test_effective_tps_falls_back_to_tps() {
        assert_eq!(effective_tps(None, Some(15.0)), Some(15.0));
        assert_eq!(effective_tps(Some(0.0), Some(15.0)), Some(15.0));
        assert_eq!(effective_tps(Some(-1.0), Some(12.5)), Some(12.5));
    }

    #[test]
    fn test_effective_tps_undefined() {
        assert_eq!(effective_tps(None, None), None);
        assert_eq!(effective_tps(Some(f64::NAN), Some(f64::INFINITY)), None);
    }

    #[test]
    fn test_parse_stats_snapshot() {
        let body = r#"{"tps":19.50,"mspt":51.20,"entities":120,"chunks":400,"players":2,
            "playerList":[{"name":"alex","ping":42},{"name":"steve","ping":310}],
            "regions":3,"memory":{"used":1024,"max":4096}}"#;
        let stats: StatsSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(stats.players, 2);
        assert_eq!(stats.player_list[1].name, "steve");
        assert_eq!(stats.player_list[1].ping, Some(310));
        assert_eq!(stats.memory.max, 4096);
        assert_eq!(stats.regions, 3);
    }

    #[test]
    fn test_parse_stats_null_tps_and_mspt() {
        let body = r#"{"tps":null,"mspt":null,"players":0,"playerList":[],"entities":0,"chunks":0,"memory":{"used":1,"max":2}}"#;
        let stats: StatsSnapshot = serde_json::from_str(body).unwrap();
        assert!(stats.effective_tps().is_none());
        assert!(stats.valid_mspt().is_none());
    }

    #[test]
    fn test_parse_lag_sources_with_breakdown() {
        let body = r#"{"isFolia":false,"lagSources":[
            {"region":"world","mspt":41.00,"tps":20.00,"cause":"Entities","entities":10,"tileEntities":3,"chunks":120}],
            "pluginBreakdown":[{"plugin":"server","percent":75.0,"samples":6}]}"#;
        let snapshot: LagSourcesSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snapshot.lag_sources.len(), 1);
        assert_eq!(snapshot.lag_sources[0].tile_entities, 3);
        assert_eq!(snapshot.lag_sources[0].chunks, Some(120));
        assert!(!snapshot.simulated);
        let breakdown = snapshot.plugin_breakdown.unwrap();
        assert_eq!(breakdown[0].plugin, "server");
        assert_eq!(breakdown[0].samples, Some(6));
    }

    #[test]
    fn test_parse_regions_folia() {
        let snapshot: RegionsSnapshot =
            serde_json::from_str(r#"{"isFolia":true,"regions":[]}"#).unwrap();
        assert!(snapshot.is_folia);
    }

    #[test]
    fn test_parse_settings_native_types() {
        let settings: RemoteSettings = serde_json::from_str(
            r#"{"autoRefresh":false,"refreshInterval":5,"requiresAdminToken":true}"#,
        )
        .unwrap();
        assert_eq!(settings.auto_refresh, Some(false));
        assert_eq!(settings.refresh_interval, Some(5));
        assert_eq!(settings.requires_admin_token, Some(true));
    }

    #[test]
    fn test_parse_settings_string_values() {
        let settings: RemoteSettings =
            serde_json::from_str(r#"{"autoRefresh":"true","refreshInterval":"10"}"#).unwrap();
        assert_eq!(settings.auto_refresh, Some(true));
        assert_eq!(settings.refresh_interval, Some(10));
        assert_eq!(settings.requires_admin_token, None);
    }

    #[test]
    fn test_parse_settings_negative_interval_keeps_other_fields() {
        let settings: RemoteSettings =
            serde_json::from_str(r#"{"autoRefresh":false,"refreshInterval":-5}"#).unwrap();
        assert_eq!(settings.auto_refresh, Some(false));
        assert_eq!(settings.refresh_interval, None);

        let settings: RemoteSettings =
            serde_json::from_str(r#"{"autoRefresh":"false","refreshInterval":"-5"}"#).unwrap();
        assert_eq!(settings.auto_refresh, Some(false));
        assert_eq!(settings.refresh_interval, None);
    }

    #[test]
    fn test_parse_settings_fractional_interval_truncated() {
        let number: RemoteSettings =
            serde_json::from_str(r#"{"refreshInterval":2.5}"#).unwrap();
        let text: RemoteSettings =
            serde_json::from_str(r#"{"refreshInterval":"2.5"}"#).unwrap();
        assert_eq!(number.refresh_interval, Some(2));
        assert_eq!(text.refresh_interval, Some(2));
    }

    #[test]
    fn test_parse_settings_garbage_is_absent() {
        let settings: RemoteSettings =
            serde_json::from_str(r#"{"autoRefresh":"maybe","refreshInterval":"soon"}"#).unwrap();
        assert_eq!(settings.auto_refresh, None);
        assert_eq!(settings.refresh_interval, None);
    }

    #[test]
    fn test_settings_update_form_skips_missing_token() {
        let update = SettingsUpdate {
            auto_refresh: Some(true),
            refresh_interval: Some(3),
            admin_token: None,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["autoRefresh"], true);
        assert_eq!(json["refreshInterval"], 3);
        assert!(json.get("adminToken").is_none());
    }
}
