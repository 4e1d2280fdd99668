//! Error types for poller control operations.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PollerError {
    /// Requested stats period is below the minimum
    #[error("refresh interval must be at least {min}ms, got {0}ms", min = super::MIN_INTERVAL_MS)]
    InvalidInterval(u64),
}
