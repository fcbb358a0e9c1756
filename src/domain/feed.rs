use std::fmt;

use serde::{Deserialize, Serialize};

/// The feeds being watched. Every capability that varies per feed is an
/// exhaustive match on this enum, so a new variant does not build until each
/// of them handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// News articles; notifications show the linked page title.
    VrtNws,
    /// Uploaded videos; notifications are built from the video API.
    Youtube,
    /// Stream announcements; notifications show an attribute scraped from the page.
    Twitch,
}

impl FeedType {
    pub const ALL: [FeedType; 3] = [FeedType::VrtNws, FeedType::Youtube, FeedType::Twitch];

    /// Position of the variant in [`FeedType::ALL`].
    pub const fn index(self) -> usize {
        match self {
            FeedType::VrtNws => 0,
            FeedType::Youtube => 1,
            FeedType::Twitch => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FeedType::VrtNws => "VrtNws",
            FeedType::Youtube => "Youtube",
            FeedType::Twitch => "Twitch",
        }
    }
}

// ALL must list every variant exactly once, in index order.
const _: () = {
    let mut i = 0;
    while i < FeedType::ALL.len() {
        assert!(FeedType::ALL[i].index() == i);
        i += 1;
    }
};

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
