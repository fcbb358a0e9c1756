//! Modification-time polling of a single feed file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::app::Result;
use crate::domain::{FeedType, Snapshot};
use crate::store::SnapshotStore;

const FEED_COUNT: usize = FeedType::ALL.len();

/// What a watcher reports once its file changed.
#[derive(Debug)]
pub struct WatchOutcome {
    pub feed: FeedType,
    /// Modification time observed before the file was read.
    pub modified: SystemTime,
    /// The freshly read snapshot, or the reason it could not be parsed.
    pub snapshot: Result<Snapshot>,
}

/// Counts running watchers per feed.
#[derive(Debug, Default)]
pub struct WatchGauge {
    active: [AtomicUsize; FEED_COUNT],
    peak: [AtomicUsize; FEED_COUNT],
    started: [AtomicUsize; FEED_COUNT],
}

impl WatchGauge {
    pub fn new() -> Self {
        Self::default()
    }

    fn enter(self: &Arc<Self>, feed: FeedType) -> GaugeGuard {
        let i = feed.index();
        let now = self.active[i].fetch_add(1, Ordering::SeqCst) + 1;
        self.peak[i].fetch_max(now, Ordering::SeqCst);
        self.started[i].fetch_add(1, Ordering::SeqCst);
        GaugeGuard {
            gauge: self.clone(),
            feed,
        }
    }

    /// Watchers currently running for `feed`.
    pub fn active(&self, feed: FeedType) -> usize {
        self.active[feed.index()].load(Ordering::SeqCst)
    }

    /// Most watchers ever running at once for `feed`.
    pub fn peak(&self, feed: FeedType) -> usize {
        self.peak[feed.index()].load(Ordering::SeqCst)
    }

    /// Watchers started for `feed` so far.
    pub fn started(&self, feed: FeedType) -> usize {
        self.started[feed.index()].load(Ordering::SeqCst)
    }
}

struct GaugeGuard {
    gauge: Arc<WatchGauge>,
    feed: FeedType,
}

impl Drop for GaugeGuard {
    fn drop(&mut self) {
        self.gauge.active[self.feed.index()].fetch_sub(1, Ordering::SeqCst);
    }
}

/// One watch cycle for one feed. Runs until the file's modification time
/// passes `baseline`, then reads it and returns; a new watcher has to be
/// created to keep watching.
pub struct FeedWatcher {
    feed: FeedType,
    path: PathBuf,
    baseline: SystemTime,
    interval: Duration,
    store: Arc<dyn SnapshotStore>,
    gauge: Arc<WatchGauge>,
}

impl FeedWatcher {
    pub fn new(
        feed: FeedType,
        path: PathBuf,
        baseline: SystemTime,
        interval: Duration,
        store: Arc<dyn SnapshotStore>,
        gauge: Arc<WatchGauge>,
    ) -> Self {
        Self {
            feed,
            path,
            baseline,
            interval,
            store,
            gauge,
        }
    }

    pub async fn watch(self) -> WatchOutcome {
        let _guard = self.gauge.enter(self.feed);

        loop {
            tokio::time::sleep(self.interval).await;

            let modified = match self.store.modified(&self.path).await {
                Ok(modified) => modified,
                Err(e) if e.is_transient() => {
                    tracing::debug!("{}: {}", self.feed, e);
                    continue;
                }
                Err(e) => {
                    tracing::warn!("{}: could not stat {}: {}", self.feed, self.path.display(), e);
                    continue;
                }
            };

            if modified <= self.baseline {
                continue;
            }

            match self.store.read(&self.path).await {
                // Removed between stat and read; wait for it to come back.
                Err(e) if e.is_transient() => continue,
                snapshot => {
                    return WatchOutcome {
                        feed: self.feed,
                        modified,
                        snapshot,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonFileStore;

    const TICK: Duration = Duration::from_millis(10);

    fn watcher(path: PathBuf, baseline: SystemTime, gauge: Arc<WatchGauge>) -> FeedWatcher {
        FeedWatcher::new(
            FeedType::Twitch,
            path,
            baseline,
            TICK,
            Arc::new(JsonFileStore::new()),
            gauge,
        )
    }

    #[tokio::test]
    async fn test_returns_snapshot_after_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeditems.json");
        std::fs::write(&path, r#"{"a": {}}"#).unwrap();
        let baseline = SystemTime::now();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let handle = tokio::spawn(watcher(path.clone(), baseline, Arc::new(WatchGauge::new())).watch());
        tokio::time::sleep(Duration::from_millis(30)).await;
        std::fs::write(&path, r#"{"a": {}, "b": {}}"#).unwrap();

        let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.feed, FeedType::Twitch);
        assert!(outcome.modified > baseline);
        assert_eq!(outcome.snapshot.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_keeps_polling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeditems.json");
        let gauge = Arc::new(WatchGauge::new());
        let baseline = SystemTime::now();

        let handle = tokio::spawn(watcher(path.clone(), baseline, gauge.clone()).watch());
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!handle.is_finished());
        assert_eq!(gauge.active(FeedType::Twitch), 1);

        std::fs::write(&path, "{}").unwrap();
        let outcome = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(outcome.snapshot.unwrap().is_empty());
        assert_eq!(gauge.active(FeedType::Twitch), 0);
        assert_eq!(gauge.started(FeedType::Twitch), 1);
    }

    #[tokio::test]
    async fn test_parse_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeditems.json");
        let baseline = SystemTime::now();
        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::write(&path, "{ broken").unwrap();

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            watcher(path, baseline, Arc::new(WatchGauge::new())).watch(),
        )
        .await
        .unwrap();
        assert!(outcome.snapshot.is_err());
    }

    #[tokio::test]
    async fn test_unchanged_file_is_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeditems.json");
        std::fs::write(&path, "{}").unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let result = tokio::time::timeout(
            Duration::from_millis(80),
            watcher(path, SystemTime::now(), Arc::new(WatchGauge::new())).watch(),
        )
        .await;
        assert!(result.is_err());
    }
}
