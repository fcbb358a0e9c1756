//! The watch loop: one [`FeedWatcher`] per feed, diffing whichever finishes
//! first and handing new entries off to notification tasks.

mod state;

pub use state::DispatcherState;

use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use tokio::sync::Semaphore;
use tokio::task::{self, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::app::{AppContext, Result};
use crate::domain::FeedType;
use crate::enricher::Enrich;
use crate::notifier::NotificationSink;
use crate::store::SnapshotStore;
use crate::watcher::{FeedWatcher, WatchGauge, WatchOutcome};

type Joined = std::result::Result<WatchOutcome, JoinError>;

/// Watcher tasks, each tagged with the feed it watches so a task that
/// panicked or was aborted can still be traced back to its feed.
#[derive(Default)]
struct WatcherSet {
    tasks: JoinSet<WatchOutcome>,
    feeds: HashMap<task::Id, FeedType>,
}

impl WatcherSet {
    fn spawn<F>(&mut self, feed: FeedType, watch: F)
    where
        F: Future<Output = WatchOutcome> + Send + 'static,
    {
        let handle = self.tasks.spawn(watch);
        self.feeds.insert(handle.id(), feed);
    }

    /// Next finished watcher, whichever feed it belongs to.
    async fn join_next(&mut self) -> Option<(FeedType, Joined)> {
        loop {
            let joined = self.tasks.join_next_with_id().await?;
            let id = match joined {
                Ok((id, _)) => id,
                Err(ref e) => e.id(),
            };
            if let Some(feed) = self.feeds.remove(&id) {
                return Some((feed, joined.map(|(_, outcome)| outcome)));
            }
        }
    }

    async fn shutdown(&mut self) {
        self.tasks.shutdown().await;
        self.feeds.clear();
    }
}

pub struct Dispatcher {
    store: Arc<dyn SnapshotStore>,
    enricher: Arc<dyn Enrich>,
    sink: Arc<dyn NotificationSink>,
    paths: HashMap<FeedType, PathBuf>,
    poll_interval: Duration,
    delivery_permits: Arc<Semaphore>,
    gauge: Arc<WatchGauge>,
    state: DispatcherState,
}

impl Dispatcher {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let mut paths = HashMap::new();
        for feed in FeedType::ALL {
            paths.insert(feed, ctx.config.feed_path(feed)?.to_path_buf());
        }

        Ok(Self {
            store: ctx.store.clone(),
            enricher: ctx.enricher.clone(),
            sink: ctx.sink.clone(),
            paths,
            poll_interval: ctx.config.poll_interval(),
            delivery_permits: Arc::new(Semaphore::new(
                ctx.config.max_concurrent_notifications.max(1),
            )),
            gauge: Arc::new(WatchGauge::new()),
            state: DispatcherState::new(SystemTime::now()),
        })
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn state(&self) -> &DispatcherState {
        &self.state
    }

    pub fn gauge(&self) -> Arc<WatchGauge> {
        self.gauge.clone()
    }

    /// Record the current contents of every feed as already seen, so entries
    /// that exist at startup never produce notifications.
    pub async fn build(&mut self) {
        info!("Building feed content history");
        self.state = DispatcherState::new(SystemTime::now());

        for feed in FeedType::ALL {
            let path = &self.paths[&feed];
            match self.store.read(path).await {
                Ok(snapshot) => {
                    info!("  {}: {} entries", feed, snapshot.len());
                    self.state.set_baseline(feed, snapshot);
                }
                Err(e) => {
                    warn!("  {}: no baseline yet ({})", feed, e);
                }
            }
        }
    }

    /// Run until interrupted by SIGINT/SIGTERM.
    pub async fn run(&mut self) {
        self.run_until(crate::daemon::shutdown_signal()).await
    }

    /// Watch every feed until `shutdown` completes. Outstanding watchers and
    /// notification tasks are cancelled on the way out.
    pub async fn run_until<F: Future<Output = ()>>(&mut self, shutdown: F) {
        let mut watchers = WatcherSet::default();
        let mut deliveries: JoinSet<()> = JoinSet::new();

        for feed in FeedType::ALL {
            self.arm(&mut watchers, feed);
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down, cancelling {} notification(s) in flight", deliveries.len());
                    break;
                }
                Some((feed, joined)) = watchers.join_next() => {
                    match joined {
                        Ok(outcome) => self.handle(outcome, &mut deliveries),
                        Err(e) => error!("Watcher for {} failed ({}), restarting it", feed, e),
                    }
                    self.arm(&mut watchers, feed);
                }
                Some(joined) = deliveries.join_next(), if !deliveries.is_empty() => {
                    if let Err(e) = joined {
                        error!("Notification task failed: {}", e);
                    }
                }
            }
        }

        watchers.shutdown().await;
        deliveries.shutdown().await;
    }

    fn arm(&self, watchers: &mut WatcherSet, feed: FeedType) {
        let watcher = FeedWatcher::new(
            feed,
            self.paths[&feed].clone(),
            self.state.baseline(feed),
            self.poll_interval,
            self.store.clone(),
            self.gauge.clone(),
        );

        watchers.spawn(feed, watcher.watch());
    }

    fn handle(&mut self, outcome: WatchOutcome, deliveries: &mut JoinSet<()>) {
        let WatchOutcome {
            feed,
            modified,
            snapshot,
        } = outcome;
        let at: DateTime<Local> = modified.into();
        info!("[{} file update at {}]", feed, at.format("%H:%M:%S"));

        let snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Skipping {} update: {}", feed, e);
                self.state.skip(feed, modified);
                return;
            }
        };

        let first_read = self.state.last_known(feed).is_none();
        let new_keys = self.state.commit(feed, snapshot, modified);

        if first_read {
            info!("{}: baseline established", feed);
        } else if new_keys.is_empty() {
            info!("{}: no new content", feed);
        } else {
            info!("{}: new content {:?}", feed, new_keys);
        }

        for key in new_keys {
            let enricher = self.enricher.clone();
            let sink = self.sink.clone();
            let permits = self.delivery_permits.clone();

            deliveries.spawn(async move {
                deliver(enricher.as_ref(), sink.as_ref(), &permits, feed, &key).await;
            });
        }
    }
}

/// Enrich one entry and show it. Failures only affect this entry.
///
/// A permit from `permits` is held while enriching only; showing the
/// notification may wait on the user indefinitely and must not hold up
/// other entries.
pub async fn deliver(
    enricher: &dyn Enrich,
    sink: &dyn NotificationSink,
    permits: &Semaphore,
    feed: FeedType,
    key: &str,
) {
    let payload = {
        let Ok(_permit) = permits.acquire().await else {
            return;
        };
        debug!("Creating notification for {} entry {}", feed, key);

        match enricher.enrich(feed, key).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Could not enrich {} entry {}: {}", feed, key, e);
                enricher.fallback(feed)
            }
        }
    };

    if let Err(e) = sink.send(&payload).await {
        warn!("Could not deliver notification for {}: {}", key, e);
    }
}
