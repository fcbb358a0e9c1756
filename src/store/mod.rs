pub mod json_file;

use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::Snapshot;

pub use json_file::JsonFileStore;

/// Read access to the snapshot files maintained by the feed reader.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read and parse the whole snapshot.
    ///
    /// Fails with `SnapshotMissing` when the file does not exist and
    /// `SnapshotParse` when it is not a JSON object.
    async fn read(&self, path: &Path) -> Result<Snapshot>;

    /// Last modification time of the snapshot file.
    async fn modified(&self, path: &Path) -> Result<SystemTime>;
}
