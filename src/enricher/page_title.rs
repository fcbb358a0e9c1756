use url::Url;

use crate::app::{FeedNotifyError, Result};
use crate::domain::{Action, FeedType, NotificationPayload};
use crate::enricher::extract;
use crate::enricher::FeedEnricher;
use crate::fetcher::fetch_text;

/// Entry keys are article links; the notification shows the article's title
/// and clicking it opens the article.
pub async fn enrich(enricher: &FeedEnricher, key: &str) -> Result<NotificationPayload> {
    let url = Url::parse(key)?;
    let html = fetch_text(enricher.fetcher.as_ref(), url.as_str()).await?;

    let title = extract::page_title(&html)
        .ok_or_else(|| FeedNotifyError::Enrichment(format!("No <title> on {}", url)))?;

    Ok(NotificationPayload::new(FeedType::VrtNws.name(), title)
        .with_image(enricher.icon(FeedType::VrtNws))
        .with_default_action(Action::open_link(
            enricher.browser.as_deref(),
            url.as_str(),
        )))
}
