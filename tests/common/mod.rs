//! Shared test utilities for tickwatch integration tests.
//!
//! Provides canned backend payloads and helpers for wiring a poller to a
//! wiremock server.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use tickwatch::client::HttpDashboardClient;
use tickwatch::dashboard::DashboardView;
use tickwatch::poller::{Poller, PollerConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A healthy Paper server: 20 TPS, two players.
pub fn stats_body() -> Value {
    json!({
        "tps": 19.98,
        "mspt": 12.5,
        "players": 2,
        "playerList": [
            {"name": "alex", "ping": 42},
            {"name": "steve", "ping": 180}
        ],
        "entities": 512,
        "chunks": 900,
        "regions": 1,
        "memory": {"used": 2048, "max": 8192}
    })
}

pub fn lag_sources_body() -> Value {
    json!({
        "lagSources": [
            {
                "region": "nether_hub",
                "tps": 15.2,
                "mspt": 65.8,
                "cause": "Hoppers",
                "entities": 80,
                "tileEntities": 640,
                "chunks": 24
            }
        ],
        "simulated": false,
        "pluginBreakdown": [
            {"plugin": "Essentials", "percent": 4.5, "samples": 9}
        ]
    })
}

/// Mount a 200 JSON response on `GET route`.
pub async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a bare status response on `GET route`.
pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Client pointed at a mock server with a short timeout.
pub fn make_client(server: &MockServer) -> Arc<HttpDashboardClient> {
    Arc::new(HttpDashboardClient::new(server.uri(), 2).unwrap())
}

/// Poller with default config, rendering into a fresh view.
pub fn make_poller(server: &MockServer) -> (Arc<Poller>, Arc<DashboardView>) {
    make_poller_with(server, PollerConfig::default())
}

pub fn make_poller_with(
    server: &MockServer,
    config: PollerConfig,
) -> (Arc<Poller>, Arc<DashboardView>) {
    let view = Arc::new(DashboardView::new(config.history_capacity));
    let poller = Arc::new(Poller::new(make_client(server), view.clone(), config));
    (poller, view)
}
