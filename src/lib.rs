//! tickwatch - live health dashboard for game servers
//!
//! Polls a server's dashboard HTTP API (stats, regions, lag sources), tracks
//! consecutive failures to detect an offline backend, and keeps rolling chart
//! windows for a terminal dashboard.

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod poller;
