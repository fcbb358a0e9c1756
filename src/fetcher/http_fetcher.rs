use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::{FeedNotifyError, Result};
use crate::fetcher::Fetcher;

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("feednotify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FeedNotifyError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        tracing::debug!("Fetched {} ({})", url, response.status());
        Ok(response.bytes().await?.to_vec())
    }
}
