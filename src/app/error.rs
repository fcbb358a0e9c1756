use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum FeedNotifyError {
    #[error("Snapshot file not found: {}", .0.display())]
    SnapshotMissing(PathBuf),

    #[error("Failed to parse snapshot {}: {source}", path.display())]
    SnapshotParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Enrichment failed: {0}")]
    Enrichment(String),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Other(String),
}

impl FeedNotifyError {
    /// Whether the failure may clear up on its own by the next poll tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedNotifyError::SnapshotMissing(_))
    }
}

pub type Result<T> = std::result::Result<T, FeedNotifyError>;
