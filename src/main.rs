use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feednotify::app::AppContext;
use feednotify::cli::Cli;
use feednotify::config::Config;
use feednotify::daemon;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(secs) = cli.interval {
        config.poll_interval_secs = secs;
    }

    let ctx = AppContext::new(config)?;
    daemon::run(&ctx).await?;

    Ok(())
}
