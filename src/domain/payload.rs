use std::path::PathBuf;

use crate::domain::FeedType;

/// What happens when the user clicks the notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A command line, split on whitespace into program and arguments.
    Command(String),
    /// Open a URL with the desktop's default handler.
    OpenUrl(String),
}

impl Action {
    /// Open `url` in `browser` when one is configured, otherwise with the
    /// system opener.
    pub fn open_link(browser: Option<&str>, url: &str) -> Self {
        match browser {
            Some(browser) => Action::Command(format!("{} --new-tab {}", browser, url)),
            None => Action::OpenUrl(url.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub image: Option<PathBuf>,
    pub default_action: Option<Action>,
    /// Reserved for additional notification buttons; not delivered yet.
    pub secondary_actions: Vec<Action>,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            image: None,
            default_action: None,
            secondary_actions: Vec::new(),
        }
    }

    /// Minimal payload used when an entry could not be enriched.
    pub fn fallback(feed: FeedType, icon: Option<PathBuf>) -> Self {
        let body = match feed {
            FeedType::VrtNws => "new article",
            FeedType::Youtube => "new_video",
            FeedType::Twitch => "new stream",
        };
        Self::new(feed.name(), body).with_image(icon)
    }

    pub fn with_image(mut self, image: Option<PathBuf>) -> Self {
        self.image = image;
        self
    }

    pub fn with_default_action(mut self, action: Action) -> Self {
        self.default_action = Some(action);
        self
    }
}
