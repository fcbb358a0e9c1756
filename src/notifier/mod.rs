pub mod notify_send;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::NotificationPayload;

pub use notify_send::NotifySend;

/// Delivery of notifications to the desktop.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Show `payload`. With a default action this waits for the user to
    /// interact and runs the action when it was chosen; without one it
    /// returns as soon as the notification is shown.
    async fn send(&self, payload: &NotificationPayload) -> Result<()>;
}
