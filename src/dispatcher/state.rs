use std::collections::{BTreeSet, HashMap};
use std::time::SystemTime;

use crate::domain::{diff, FeedType, Snapshot};

#[derive(Debug, Clone)]
struct FeedState {
    /// `None` until the feed file has been read successfully once.
    snapshot: Option<Snapshot>,
    /// Changes are only picked up when the file is modified after this.
    baseline: SystemTime,
}

/// What the dispatcher has seen of each feed. Only the dispatcher loop
/// mutates it, and only after a feed's watch cycle has completed.
#[derive(Debug, Clone)]
pub struct DispatcherState {
    feeds: HashMap<FeedType, FeedState>,
    last_check: SystemTime,
}

impl DispatcherState {
    pub fn new(last_check: SystemTime) -> Self {
        let feeds = FeedType::ALL
            .into_iter()
            .map(|feed| {
                (
                    feed,
                    FeedState {
                        snapshot: None,
                        baseline: last_check,
                    },
                )
            })
            .collect();

        Self { feeds, last_check }
    }

    fn feed(&self, feed: FeedType) -> &FeedState {
        &self.feeds[&feed]
    }

    fn feed_mut(&mut self, feed: FeedType) -> &mut FeedState {
        self.feeds
            .entry(feed)
            .or_insert_with(|| FeedState {
                snapshot: None,
                baseline: SystemTime::UNIX_EPOCH,
            })
    }

    pub fn last_known(&self, feed: FeedType) -> Option<&Snapshot> {
        self.feed(feed).snapshot.as_ref()
    }

    pub fn baseline(&self, feed: FeedType) -> SystemTime {
        self.feed(feed).baseline
    }

    /// When any feed was last committed (or the state was created).
    pub fn last_check(&self) -> SystemTime {
        self.last_check
    }

    /// Store `snapshot` as already seen without comparing it to anything.
    pub fn set_baseline(&mut self, feed: FeedType, snapshot: Snapshot) {
        self.feed_mut(feed).snapshot = Some(snapshot);
    }

    /// Diff `snapshot` against the last committed snapshot for `feed` and
    /// commit it. Returns the new entry keys; the first snapshot ever seen for
    /// a feed only establishes the baseline and yields nothing.
    pub fn commit(
        &mut self,
        feed: FeedType,
        snapshot: Snapshot,
        modified: SystemTime,
    ) -> BTreeSet<String> {
        let state = self.feed_mut(feed);
        let new_keys = match state.snapshot {
            Some(ref previous) => diff(previous, &snapshot),
            None => BTreeSet::new(),
        };

        state.snapshot = Some(snapshot);
        state.baseline = state.baseline.max(modified);
        self.last_check = SystemTime::now();

        new_keys
    }

    /// Move past an update that could not be read, keeping the last snapshot.
    pub fn skip(&mut self, feed: FeedType, modified: SystemTime) {
        let state = self.feed_mut(feed);
        state.baseline = state.baseline.max(modified);
    }
}
