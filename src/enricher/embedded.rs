use url::Url;

use crate::app::{FeedNotifyError, Result};
use crate::domain::{FeedType, NotificationPayload};
use crate::enricher::extract;
use crate::enricher::FeedEnricher;
use crate::fetcher::fetch_text;

/// Entry keys are page links; the notification body is the page's embedded
/// `content` attribute. No image and no click action.
pub async fn enrich(enricher: &FeedEnricher, key: &str) -> Result<NotificationPayload> {
    let url = Url::parse(key)?;
    let html = fetch_text(enricher.fetcher.as_ref(), url.as_str()).await?;

    let body = extract::embedded_content(&html)
        .ok_or_else(|| FeedNotifyError::Enrichment(format!("No content attribute on {}", url)))?;

    Ok(NotificationPayload::new(FeedType::Twitch.name(), body))
}
