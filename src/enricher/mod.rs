//! Turning bare entry keys into notifications.
//!
//! Each [`FeedType`] has its own strategy, selected by an exhaustive match in
//! [`FeedEnricher`]:
//!
//! - `VrtNws`: the key is an article link; the body is the page title.
//! - `Youtube`: the key carries a video id; title, channel and thumbnail come
//!   from the metadata API.
//! - `Twitch`: the key is a page link; the body is an attribute scraped from
//!   the page.

mod embedded;
pub mod extract;
mod page_title;
mod thumbnail;
mod video_api;

pub use thumbnail::ThumbnailCache;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::app::Result;
use crate::config::Config;
use crate::domain::{FeedType, NotificationPayload};
use crate::fetcher::Fetcher;

/// Builds the notification for a newly seen entry.
#[async_trait]
pub trait Enrich: Send + Sync {
    /// May make network calls and may fail; callers fall back to
    /// [`Enrich::fallback`] on error.
    async fn enrich(&self, feed: FeedType, key: &str) -> Result<NotificationPayload>;

    /// Minimal payload for an entry that could not be enriched.
    fn fallback(&self, feed: FeedType) -> NotificationPayload {
        NotificationPayload::fallback(feed, None)
    }
}

pub struct FeedEnricher {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    browser: Option<String>,
    api_key: Option<String>,
    icons: HashMap<FeedType, PathBuf>,
    thumbnails: ThumbnailCache,
}

impl FeedEnricher {
    pub fn new(
        fetcher: Arc<dyn Fetcher + Send + Sync>,
        browser: Option<String>,
        api_key: Option<String>,
        thumbnails: ThumbnailCache,
    ) -> Self {
        Self {
            fetcher,
            browser,
            api_key,
            icons: HashMap::new(),
            thumbnails,
        }
    }

    pub fn from_config(config: &Config, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Result<Self> {
        let mut enricher = Self::new(
            fetcher,
            config.browser(),
            config.api_key()?,
            ThumbnailCache::new(config.thumbnail_dir()?),
        );
        for feed in FeedType::ALL {
            if let Some(icon) = config.feed_icon(feed) {
                enricher = enricher.with_icon(feed, icon);
            }
        }
        Ok(enricher)
    }

    pub fn with_icon(mut self, feed: FeedType, icon: impl Into<PathBuf>) -> Self {
        self.icons.insert(feed, icon.into());
        self
    }

    fn icon(&self, feed: FeedType) -> Option<PathBuf> {
        self.icons.get(&feed).cloned()
    }

    fn fallback_payload(&self, feed: FeedType) -> NotificationPayload {
        NotificationPayload::fallback(feed, self.icon(feed))
    }
}

#[async_trait]
impl Enrich for FeedEnricher {
    async fn enrich(&self, feed: FeedType, key: &str) -> Result<NotificationPayload> {
        match feed {
            FeedType::VrtNws => page_title::enrich(self, key).await,
            FeedType::Youtube => video_api::enrich(self, key).await,
            FeedType::Twitch => embedded::enrich(self, key).await,
        }
    }

    fn fallback(&self, feed: FeedType) -> NotificationPayload {
        self.fallback_payload(feed)
    }
}
