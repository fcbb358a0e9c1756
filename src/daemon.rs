//! Long-running entry point: builds the dispatcher, watches until a shutdown
//! signal arrives.

use chrono::Local;

use crate::app::{AppContext, Result};
use crate::dispatcher::Dispatcher;

/// Parse interval string like "5", "5s", "1m", "1h", "1d" into seconds.
pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_lowercase();

    if let Some(hours) = s.strip_suffix('h') {
        scaled(hours, "hours", 3600)
    } else if let Some(minutes) = s.strip_suffix('m') {
        scaled(minutes, "minutes", 60)
    } else if let Some(days) = s.strip_suffix('d') {
        scaled(days, "days", 86400)
    } else if let Some(secs) = s.strip_suffix('s') {
        scaled(secs, "seconds", 1)
    } else {
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '5s', '1m'", s))
    }
}

fn scaled(count: &str, unit: &str, secs_per_unit: u64) -> std::result::Result<u64, String> {
    count
        .parse::<u64>()
        .map_err(|_| format!("Invalid {}: {}", unit, count))?
        .checked_mul(secs_per_unit)
        .ok_or_else(|| format!("Interval too large: {}{}", count, &unit[..1]))
}

/// Format interval for display
pub fn format_interval(secs: u64) -> String {
    if secs >= 86400 && secs.is_multiple_of(86400) {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs.is_multiple_of(3600) {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs.is_multiple_of(60) {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

/// Completes on SIGINT or SIGTERM (ctrl-c elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Failed to set up signal handlers ({}), using ctrl-c", e);
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Build the baseline and watch all feeds until interrupted.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let mut dispatcher = Dispatcher::new(ctx)?;

    tracing::info!(
        "feednotify started at {} (poll interval: {}, PID: {})",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        format_interval(ctx.config.poll_interval_secs),
        std::process::id()
    );

    dispatcher.build().await;
    dispatcher.run().await;

    tracing::info!("Interrupted, exiting safely");
    Ok(())
}
