use std::path::PathBuf;

use clap::Parser;

use crate::daemon::parse_interval;

#[derive(Parser, Debug)]
#[command(name = "feednotify")]
#[command(about = "Desktop notifications for new entries in feed reader snapshots", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/feednotify/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Poll interval, overriding the config file (e.g. "5s", "1m")
    #[arg(short, long, value_parser = parse_interval)]
    pub interval: Option<u64>,
}
