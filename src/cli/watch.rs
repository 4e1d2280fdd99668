//! `tickwatch watch` - live dashboard

use crate::cli::output::format_dashboard;
use crate::cli::{connect, WatchArgs};
use crate::client::Settings;
use crate::dashboard::DashboardView;
use crate::poller::Poller;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How often the screen is redrawn, independent of the poll cadence.
const FRAME_INTERVAL: Duration = Duration::from_secs(1);

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// Settings given explicitly on the command line.
///
/// These are re-applied after the backend's settings are loaded so they win.
pub fn cli_overrides(args: &WatchArgs) -> Settings {
    Settings {
        auto_refresh: args.no_auto_refresh.then_some(false),
        refresh_interval: args.interval,
    }
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => return,
    }

    cancel_token.cancel();
}

/// Main watch command handler
pub async fn run_watch(args: WatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Config, logging, client
    let (mut config, api) = connect(&args.connect)?;
    if let Some(secs) = args.interval {
        config.poller.refresh_interval_seconds = secs;
    }
    if args.no_auto_refresh {
        config.poller.auto_refresh = false;
    }

    // 2. View and poller
    let view = Arc::new(DashboardView::new(config.poller.history_capacity));
    let poller = Arc::new(Poller::new(api, view.clone(), config.poller.clone()));

    // 3. Backend settings, then CLI flags on top
    if !args.no_sync_settings {
        if let Some(remote) = poller.sync_settings().await {
            tracing::debug!(?remote, "Loaded backend settings");
        }
        poller.apply_settings(&cli_overrides(&args));
    }

    // 4. Poll loops and signal handling
    let cancel_token = CancellationToken::new();
    let handle = poller.clone().start(cancel_token.clone());
    tokio::spawn(shutdown_signal(cancel_token.clone()));

    // 5. Render until interrupted or the frame budget runs out
    let mut ticker = tokio::time::interval(FRAME_INTERVAL);
    let mut frames: u64 = 0;
    let mut stdout = std::io::stdout();

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                let frame = format_dashboard(&view.snapshot(), &poller.state(), &config.server.url);
                write!(stdout, "{}{}", CLEAR_SCREEN, frame)?;
                stdout.flush()?;

                frames += 1;
                if args.frames.is_some_and(|max| frames >= max) {
                    cancel_token.cancel();
                    break;
                }
            }
        }
    }

    // 6. Cleanup
    tracing::info!("Waiting for poller to stop");
    handle.await?;
    Ok(())
}
