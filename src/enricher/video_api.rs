use serde::Deserialize;
use url::Url;

use crate::app::{FeedNotifyError, Result};
use crate::domain::{Action, FeedType, NotificationPayload};
use crate::enricher::FeedEnricher;
use crate::fetcher::fetch_json;

pub const VIDEOS_ENDPOINT: &str = "https://youtube.googleapis.com/youtube/v3/videos";
pub const CHANNELS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/channels";

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Video {
    snippet: VideoSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_id: String,
    channel_title: String,
}

#[derive(Debug, Deserialize)]
struct Channel {
    snippet: ChannelSnippet,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Video id from an entry key of the form `yt:video:<id>`.
pub fn video_id(key: &str) -> Option<&str> {
    key.split(':').nth(2).filter(|id| !id.is_empty())
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn videos_url(video_id: &str, api_key: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        VIDEOS_ENDPOINT,
        &[
            ("part", "snippet,contentDetails,statistics"),
            ("id", video_id),
            ("key", api_key),
        ],
    )?)
}

fn channels_url(channel_id: &str, api_key: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        CHANNELS_ENDPOINT,
        &[
            ("part", "snippet,statistics"),
            ("id", channel_id),
            ("key", api_key),
        ],
    )?)
}

/// Build a notification from the video and channel metadata APIs.
///
/// An empty item list from either lookup yields the feed's fallback payload
/// rather than an error.
pub async fn enrich(enricher: &FeedEnricher, key: &str) -> Result<NotificationPayload> {
    let video_id = video_id(key)
        .ok_or_else(|| FeedNotifyError::Enrichment(format!("No video id in key {:?}", key)))?;
    let api_key = enricher
        .api_key
        .as_deref()
        .ok_or_else(|| FeedNotifyError::Enrichment("No API key configured".to_string()))?;
    let fetcher = enricher.fetcher.as_ref();

    let videos: ListResponse<Video> =
        fetch_json(fetcher, videos_url(video_id, api_key)?.as_str()).await?;
    let Some(video) = videos.items.into_iter().next() else {
        tracing::warn!("Video {} not found, using fallback notification", video_id);
        return Ok(enricher.fallback_payload(FeedType::Youtube));
    };
    let snippet = video.snippet;

    let channels: ListResponse<Channel> =
        fetch_json(fetcher, channels_url(&snippet.channel_id, api_key)?.as_str()).await?;
    let Some(channel) = channels.items.into_iter().next() else {
        tracing::warn!(
            "Channel {} not found, using fallback notification",
            snippet.channel_id
        );
        return Ok(enricher.fallback_payload(FeedType::Youtube));
    };

    let image = match channel.snippet.thumbnails.medium {
        Some(thumbnail) => match enricher
            .thumbnails
            .get_or_fetch(fetcher, &thumbnail.url, &snippet.channel_id)
            .await
        {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Thumbnail for {} unavailable: {}", snippet.channel_id, e);
                None
            }
        },
        None => None,
    };

    Ok(NotificationPayload::new(snippet.channel_title, snippet.title)
        .with_image(image)
        .with_default_action(Action::open_link(
            enricher.browser.as_deref(),
            &watch_url(video_id),
        )))
}
