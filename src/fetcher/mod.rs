pub mod http_fetcher;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::app::{FeedNotifyError, Result};

pub use http_fetcher::HttpFetcher;

/// Outbound GET requests made while enriching notifications.
#[async_trait]
pub trait Fetcher {
    /// Fetch `url` and return the response body. Non-success statuses are errors.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Fetch a page and decode it as (lossy) UTF-8.
pub async fn fetch_text(fetcher: &(dyn Fetcher + Send + Sync), url: &str) -> Result<String> {
    let body = fetcher.fetch(url).await?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Fetch a JSON document and deserialize it.
pub async fn fetch_json<T: DeserializeOwned>(
    fetcher: &(dyn Fetcher + Send + Sync),
    url: &str,
) -> Result<T> {
    let body = fetcher.fetch(url).await?;
    serde_json::from_slice(&body)
        .map_err(|e| FeedNotifyError::Enrichment(format!("Invalid JSON from {}: {}", url, e)))
}
