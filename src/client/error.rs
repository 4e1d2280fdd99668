//! Error types for dashboard API requests.

use thiserror::Error;

/// Errors that can occur while polling a dashboard endpoint.
///
/// The poller counts every variant as one failure; the variants exist so logs
/// can tell an unreachable backend apart from a misbehaving one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Non-2xx status
    #[error("HTTP error: {0}")]
    HttpError(u16),

    /// Body was not the expected JSON
    #[error("invalid response: {0}")]
    ParseError(String),

    /// Base URL could not be joined with an endpoint path
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl PollError {
    /// Classify a reqwest error into a PollError.
    pub fn from_reqwest(e: reqwest::Error, timeout_seconds: u64) -> Self {
        if e.is_timeout() {
            PollError::Timeout(timeout_seconds)
        } else if e.is_decode() {
            PollError::ParseError(e.to_string())
        } else if let Some(status) = e.status() {
            PollError::HttpError(status.as_u16())
        } else {
            PollError::ConnectionFailed(e.to_string())
        }
    }

    /// Short label used for log fields and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            PollError::Timeout(_) => "timeout",
            PollError::ConnectionFailed(_) => "connection",
            PollError::HttpError(_) => "http",
            PollError::ParseError(_) => "parse",
            PollError::InvalidUrl(_) => "url",
        }
    }
}
