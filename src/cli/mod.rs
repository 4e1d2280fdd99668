//! CLI module for tickwatch
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `watch` - Live dashboard that polls the backend until interrupted
//! - `stats` - One-shot server stats
//! - `lag` - One-shot lag-source ranking
//! - `players` - One-shot player list
//! - `settings` - Show or change the backend's refresh settings
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch a server with a 5 second refresh
//! tickwatch watch --url http://mc.example.net:8080 --interval 5
//!
//! # Current stats as JSON
//! tickwatch stats --json
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod query;
pub mod settings;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::client::{DashboardApi, HttpDashboardClient};
use crate::config::TickwatchConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// tickwatch - live game-server health dashboard
#[derive(Parser, Debug)]
#[command(
    name = "tickwatch",
    version,
    about = "Live terminal dashboard for game-server health endpoints"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the backend and render a live dashboard
    Watch(WatchArgs),
    /// Show current server stats
    Stats(QueryArgs),
    /// Show the lag-source ranking
    Lag(QueryArgs),
    /// List online players
    Players(QueryArgs),
    /// Show or change refresh settings on the backend
    #[command(subcommand)]
    Settings(SettingsCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that talks to the backend.
#[derive(Args, Debug, Clone)]
pub struct ConnectArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "tickwatch.toml")]
    pub config: PathBuf,

    /// Dashboard base URL (e.g., http://localhost:8080)
    #[arg(short, long, env = "TICKWATCH_URL")]
    pub url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TICKWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Seconds between stats polls
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Start with the stats timer disabled
    #[arg(long)]
    pub no_auto_refresh: bool,

    /// Do not load refresh settings from the backend at startup
    #[arg(long)]
    pub no_sync_settings: bool,

    /// Exit after drawing this many frames
    #[arg(long)]
    pub frames: Option<u64>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show the backend's refresh settings
    Show(QueryArgs),
    /// Change the backend's refresh settings
    Set(SettingsSetArgs),
}

#[derive(Args, Debug)]
pub struct SettingsSetArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Enable or disable automatic refresh
    #[arg(long)]
    pub auto_refresh: Option<bool>,

    /// Seconds between stats polls (1-600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub interval: Option<u64>,

    /// Admin token, if the backend requires one
    #[arg(long, env = "TICKWATCH_ADMIN_TOKEN")]
    pub admin_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "tickwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ConnectArgs,
) -> Result<TickwatchConfig, Box<dyn std::error::Error>> {
    // Load from file if it exists, otherwise use defaults
    let mut config = if args.config.exists() {
        TickwatchConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        TickwatchConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.url {
        config.server.url = url.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Load config, start logging and build an API client.
pub fn connect(
    args: &ConnectArgs,
) -> Result<(TickwatchConfig, Arc<dyn DashboardApi>), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(args)?;
    config.validate()?;

    // A subscriber may already be installed (tests); that is fine.
    let _ = crate::logging::init_tracing(&config.logging);

    let client = HttpDashboardClient::new(&config.server.url, config.server.timeout_seconds)?;
    Ok((config, Arc::new(client)))
}
