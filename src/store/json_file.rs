use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::app::{FeedNotifyError, Result};
use crate::domain::Snapshot;
use crate::store::SnapshotStore;

/// Snapshot files stored as a single JSON object on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct JsonFileStore;

impl JsonFileStore {
    pub fn new() -> Self {
        Self
    }
}

fn map_io(path: &Path, err: std::io::Error) -> FeedNotifyError {
    if err.kind() == ErrorKind::NotFound {
        FeedNotifyError::SnapshotMissing(path.to_path_buf())
    } else {
        FeedNotifyError::Io(err)
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn read(&self, path: &Path) -> Result<Snapshot> {
        let contents = tokio::fs::read(path).await.map_err(|e| map_io(path, e))?;

        Snapshot::from_slice(&contents).map_err(|source| FeedNotifyError::SnapshotParse {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn modified(&self, path: &Path) -> Result<SystemTime> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| map_io(path, e))?;
        Ok(metadata.modified()?)
    }
}
