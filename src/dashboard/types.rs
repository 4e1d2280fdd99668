//! Presentation types derived from snapshots

use serde::{Deserialize, Serialize};

/// TPS at or above which the server is considered healthy.
pub const HEALTHY_TPS: f64 = 19.0;

/// Status badge shown next to TPS and MSPT readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    Excellent,
    Good,
    Warning,
    Critical,
    NotAvailable,
}

impl Badge {
    /// Badge for an effective TPS reading.
    pub fn for_tps(tps: Option<f64>) -> Self {
        match tps.filter(|t| t.is_finite()) {
            None => Badge::NotAvailable,
            Some(t) if t >= HEALTHY_TPS => Badge::Excellent,
            Some(_) => Badge::Critical,
        }
    }

    /// Badge for a milliseconds-per-tick reading.
    pub fn for_mspt(mspt: Option<f64>) -> Self {
        match mspt.filter(|m| m.is_finite()) {
            None => Badge::NotAvailable,
            Some(m) if m < 10.0 => Badge::Excellent,
            Some(m) if m < 30.0 => Badge::Good,
            Some(m) if m < 50.0 => Badge::Warning,
            Some(_) => Badge::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Badge::Excellent => "Excellent",
            Badge::Good => "Good",
            Badge::Warning => "Warning",
            Badge::Critical => "Critical",
            Badge::NotAvailable => "N/A",
        }
    }
}

/// Colour bucket for a player's ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PingLevel {
    Good,
    Elevated,
    High,
    Unknown,
}

impl PingLevel {
    pub fn classify(ping_ms: Option<i64>) -> Self {
        match ping_ms {
            None => PingLevel::Unknown,
            Some(p) if p > 300 => PingLevel::High,
            Some(p) if p > 150 => PingLevel::Elevated,
            Some(_) => PingLevel::Good,
        }
    }
}

/// Format an effective TPS for display.
pub fn format_tps(tps: Option<f64>) -> String {
    match tps.filter(|t| t.is_finite()) {
        Some(t) => format!("{:.2}", t),
        None => "n/a".to_string(),
    }
}

/// Format an MSPT for display; negative readings mean "not measured".
pub fn format_mspt(mspt: Option<f64>) -> String {
    match mspt.filter(|m| m.is_finite() && *m >= 0.0) {
        Some(m) => format!("{:.2}ms", m),
        None => "n/a".to_string(),
    }
}

/// Format a ping for display.
pub fn format_ping(ping_ms: Option<i64>) -> String {
    match ping_ms {
        Some(p) => format!("{}ms", p),
        None => "-ms".to_string(),
    }
}
