//! # feednotify
//!
//! Desktop notifications for new entries in locally mirrored feed snapshots.
//!
//! ## Architecture
//!
//! ```text
//! FeedWatcher (one per feed) → Dispatcher → diff → Enricher → NotificationSink
//! ```
//!
//! A feed reader keeps one JSON snapshot file per feed. Each file is polled by
//! modification time; when it changes, the new snapshot is diffed against the
//! last one seen and every newly added entry becomes a notification.
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`cli`]: Command-line arguments
//! - [`config`]: TOML configuration
//! - [`daemon`]: Process entry point and shutdown handling
//! - [`dispatcher`]: The watch/diff/dispatch loop
//! - [`domain`]: Feed types, snapshots, notification payloads
//! - [`enricher`]: Per-feed notification building
//! - [`fetcher`]: Outbound HTTP
//! - [`notifier`]: Desktop notification delivery
//! - [`store`]: Snapshot file access
//! - [`watcher`]: Modification-time polling

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the snapshot
/// store, enricher and notification sink.
pub mod app;

/// Command-line interface using clap.
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/feednotify/config.toml`: feed file paths, poll
/// interval, browser, API key and notification settings.
pub mod config;

/// Startup, baseline building and signal handling.
pub mod daemon;

/// Runs one watcher per feed and reacts to whichever changes first.
///
/// - [`Dispatcher`](dispatcher::Dispatcher): the watch loop
/// - [`DispatcherState`](dispatcher::DispatcherState): last committed snapshot per feed
pub mod dispatcher;

/// Core domain models.
///
/// - [`FeedType`](domain::FeedType): the watched feeds
/// - [`Snapshot`](domain::Snapshot): entry-key to record mapping, with [`diff`](domain::diff)
/// - [`NotificationPayload`](domain::NotificationPayload): what gets shown
pub mod domain;

/// Turning entry keys into notifications, per feed type.
pub mod enricher;

/// HTTP fetching.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for GET requests
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Desktop notifications.
///
/// - [`NotificationSink`](notifier::NotificationSink): delivery trait
/// - [`NotifySend`](notifier::NotifySend): `notify-send` implementation
pub mod notifier;

/// Snapshot file access.
///
/// - [`SnapshotStore`](store::SnapshotStore): Trait for reading snapshots
/// - [`JsonFileStore`](store::JsonFileStore): JSON files on disk
pub mod store;

/// Polling a feed file for modifications.
pub mod watcher;
