//! Dashboard backend connection settings

use serde::{Deserialize, Serialize};

/// Where the dashboard API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the dashboard web server
    pub url: String,
    pub timeout_seconds: u64,
    /// Sent with settings changes when the backend requires it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8080".to_string(),
            timeout_seconds: 5,
            admin_token: None,
        }
    }
}
