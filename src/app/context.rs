use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::enricher::{Enrich, FeedEnricher};
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::notifier::{NotificationSink, NotifySend};
use crate::store::{JsonFileStore, SnapshotStore};

/// Everything the dispatcher needs, built once at startup.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn SnapshotStore>,
    pub enricher: Arc<dyn Enrich>,
    pub sink: Arc<dyn NotificationSink>,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let fetcher: Arc<dyn Fetcher + Send + Sync> = Arc::new(HttpFetcher::new()?);
        let enricher = Arc::new(FeedEnricher::from_config(&config, fetcher)?);
        let sink = Arc::new(NotifySend::new(config.notify_command.clone()));

        Ok(Self {
            config,
            store: Arc::new(JsonFileStore::new()),
            enricher,
            sink,
        })
    }
}
