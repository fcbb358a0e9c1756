pub mod feed;
pub mod payload;
pub mod snapshot;

pub use feed::FeedType;
pub use payload::{Action, NotificationPayload};
pub use snapshot::{diff, Snapshot};
