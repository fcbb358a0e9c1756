use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::app::{FeedNotifyError, Result};
use crate::fetcher::Fetcher;

/// Channel thumbnails kept on disk, one file per channel id.
///
/// Entries are never evicted; the directory grows with every new channel.
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    dir: PathBuf,
}

impl ThumbnailCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, channel_id: &str) -> Result<PathBuf> {
        let valid = !channel_id.is_empty()
            && channel_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(FeedNotifyError::Enrichment(format!(
                "Unusable channel id for thumbnail cache: {:?}",
                channel_id
            )));
        }
        Ok(self.dir.join(format!("{}.jpg", channel_id)))
    }

    /// Return the cached thumbnail for `channel_id`, downloading it from `url`
    /// first if it is not cached yet.
    pub async fn get_or_fetch(
        &self,
        fetcher: &(dyn Fetcher + Send + Sync),
        url: &str,
        channel_id: &str,
    ) -> Result<PathBuf> {
        let path = self.path_for(channel_id)?;
        if tokio::fs::try_exists(&path).await? {
            tracing::debug!("Thumbnail cache hit for {}", channel_id);
            return Ok(path);
        }

        let image = fetcher.fetch(url).await?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let size = image.len();
        let (dir, dest) = (self.dir.clone(), path.clone());
        let written = tokio::task::spawn_blocking(move || store(&dir, &dest, &image))
            .await
            .map_err(|e| FeedNotifyError::Other(format!("Thumbnail writer failed: {}", e)))??;

        if written {
            tracing::info!("Cached thumbnail for channel {} ({} bytes)", channel_id, size);
        } else {
            tracing::debug!("Thumbnail for {} was cached concurrently", channel_id);
        }
        Ok(path)
    }
}

/// Write `image` to a private temp file in `dir` and move it to `dest` only if
/// nothing is there yet. Returns false when another writer got there first;
/// `dest` is complete either way.
fn store(dir: &Path, dest: &Path, image: &[u8]) -> std::io::Result<bool> {
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(image)?;
    match file.persist_noclobber(dest) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error),
    }
}
