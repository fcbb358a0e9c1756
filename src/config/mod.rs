//! Configuration management for feednotify.
//!
//! Configuration is read from `~/.config/feednotify/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::FeedType;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_MAX_CONCURRENT_NOTIFICATIONS: usize = 8;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between modification-time checks of each feed file.
    pub poll_interval_secs: u64,
    /// Browser command used to open links. Falls back to `$BROWSER`, then the
    /// system opener.
    pub browser: Option<String>,
    /// Program that displays desktop notifications.
    pub notify_command: String,
    /// Upper bound on entries being enriched at once.
    pub max_concurrent_notifications: usize,
    /// Where channel thumbnails are cached. Defaults to the user cache dir.
    pub thumbnail_dir: Option<PathBuf>,
    pub api: ApiConfig,
    pub feeds: FeedsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            browser: None,
            notify_command: "notify-send".to_string(),
            max_concurrent_notifications: DEFAULT_MAX_CONCURRENT_NOTIFICATIONS,
            thumbnail_dir: None,
            api: ApiConfig::default(),
            feeds: FeedsConfig::default(),
        }
    }
}

/// Credentials for the video metadata API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub key: Option<String>,
    /// File holding the key; used when `key` is not set.
    pub key_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Snapshot file maintained by the feed reader.
    pub path: Option<PathBuf>,
    /// Icon shown on notifications for this feed.
    pub icon: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub vrtnws: FeedConfig,
    pub youtube: FeedConfig,
    pub twitch: FeedConfig,
}

impl FeedsConfig {
    pub fn get(&self, feed: FeedType) -> &FeedConfig {
        match feed {
            FeedType::VrtNws => &self.vrtnws,
            FeedType::Youtube => &self.youtube,
            FeedType::Twitch => &self.twitch,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/feednotify/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feednotify").join("config.toml"))
    }

    /// Check that every feed has a snapshot path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for feed in FeedType::ALL {
            self.feed_path(feed)?;
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.max_concurrent_notifications == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_notifications must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn feed_path(&self, feed: FeedType) -> Result<&Path, ConfigError> {
        self.feeds
            .get(feed)
            .path
            .as_deref()
            .ok_or(ConfigError::MissingFeedPath(feed))
    }

    pub fn feed_icon(&self, feed: FeedType) -> Option<&Path> {
        self.feeds.get(feed).icon.as_deref()
    }

    /// Configured browser, or `$BROWSER` when unset.
    pub fn browser(&self) -> Option<String> {
        self.browser
            .clone()
            .or_else(|| std::env::var("BROWSER").ok())
            .filter(|b| !b.trim().is_empty())
    }

    /// Resolve the API key from `api.key` or the contents of `api.key_file`.
    pub fn api_key(&self) -> Result<Option<String>, ConfigError> {
        if let Some(ref key) = self.api.key {
            return Ok(Some(key.trim().to_string()));
        }
        match self.api.key_file {
            Some(ref path) => fs::read_to_string(path)
                .map(|k| Some(k.trim().to_string()))
                .map_err(|e| ConfigError::Io {
                    path: path.clone(),
                    source: e,
                }),
            None => Ok(None),
        }
    }

    pub fn thumbnail_dir(&self) -> Result<PathBuf, ConfigError> {
        match self.thumbnail_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|d| d.join("feednotify").join("thumbnails"))
                .ok_or(ConfigError::NoCacheDir),
        }
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# feednotify configuration
#
# Every feed needs a `path` pointing at the JSON snapshot file written by
# your feed reader (e.g. Thunderbird's `Mail/Feeds/feeditems.json`).

# Seconds between checks of each feed file
poll_interval_secs = 5

# Program used to show notifications
notify_command = "notify-send"

# Entries enriched at the same time
max_concurrent_notifications = 8

# Browser used for the notification's default action. Defaults to $BROWSER,
# or the system opener when that is unset.
# browser = "firefox"

# Channel thumbnail cache (defaults to ~/.cache/feednotify/thumbnails)
# thumbnail_dir = "/home/me/.cache/feednotify/thumbnails"

[api]
# Key for the video metadata API, inline or read from a file
# key = "..."
# key_file = "/home/me/.config/feednotify/apikey.txt"

[feeds.vrtnws]
# path = "/home/me/.thunderbird/profile/Mail/Feeds-2/feeditems.json"
# icon = "/home/me/Pictures/logos/vrtnws.jpg"

[feeds.youtube]
# path = "/home/me/.thunderbird/profile/Mail/Feeds/feeditems.json"

[feeds.twitch]
# path = "/home/me/.thunderbird/profile/Mail/Feeds-3/feeditems.json"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine cache directory")]
    NoCacheDir,

    #[error("No snapshot path configured for feed {0}")]
    MissingFeedPath(FeedType),

    #[error("{0}")]
    Invalid(String),

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.poll_interval_secs, 5);
        assert_eq!(config.notify_command, "notify-send");
        assert_eq!(config.max_concurrent_notifications, 8);
        assert!(config.feeds.youtube.path.is_none());
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");

        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(config.api.key.is_none());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingFeedPath(FeedType::VrtNws))
        ));
    }

    #[test]
    fn test_feed_sections() {
        let content = r##"
poll_interval_secs = 2

[feeds.vrtnws]
path = "/tmp/news.json"
icon = "/tmp/news.jpg"

[feeds.youtube]
path = "/tmp/videos.json"

[feeds.twitch]
path = "/tmp/streams.json"
"##;
        let config: Config = toml::from_str(content).expect("Feed config should work");

        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval_secs, 2);
        assert_eq!(
            config.feed_path(FeedType::Youtube).unwrap(),
            Path::new("/tmp/videos.json")
        );
        assert_eq!(
            config.feed_icon(FeedType::VrtNws),
            Some(Path::new("/tmp/news.jpg"))
        );
        assert_eq!(config.feed_icon(FeedType::Twitch), None);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut config = Config::default();
        config.feeds.vrtnws.path = Some("/a".into());
        config.feeds.youtube.path = Some("/b".into());
        config.feeds.twitch.path = Some("/c".into());
        assert!(config.validate().is_ok());

        config.poll_interval_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_api_key_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("apikey.txt");
        fs::write(&key_path, "  secret-key\n").unwrap();

        let mut config = Config::default();
        config.api.key_file = Some(key_path);
        assert_eq!(config.api_key().unwrap().as_deref(), Some("secret-key"));

        config.api.key = Some("inline".into());
        assert_eq!(config.api_key().unwrap().as_deref(), Some("inline"));
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "poll_interval_secs = \"soon\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
