//! Placeholder lag sources shown when the backend has none to report.

use crate::client::{LagSource, LagSourcesSnapshot};

fn entry(region: &str, tps: f64, mspt: f64, cause: &str, entities: i64, tile_entities: i64) -> LagSource {
    LagSource {
        region: region.to_string(),
        tps: Some(tps),
        mspt: Some(mspt),
        cause: cause.to_string(),
        entities,
        tile_entities,
        chunks: None,
    }
}

/// Fixed three-entry dataset, always marked simulated.
pub fn simulated_lag_sources() -> LagSourcesSnapshot {
    LagSourcesSnapshot {
        lag_sources: vec![
            entry("world_spawn", 12.4, 83.2, "Redstone & Tickload", 312, 54),
            entry("village_1", 18.2, 22.6, "Entities (mobs)", 120, 12),
            entry("market", 9.8, 110.1, "Chunks + TileEntities", 48, 220),
        ],
        simulated: true,
        plugin_breakdown: None,
    }
}
