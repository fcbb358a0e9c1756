use async_trait::async_trait;
use tokio::process::Command;

use crate::app::{FeedNotifyError, Result};
use crate::domain::{Action, NotificationPayload};
use crate::notifier::NotificationSink;

const DEFAULT_ACTION: &str = "default";

/// Notifications through a `notify-send` compatible program.
#[derive(Debug, Clone)]
pub struct NotifySend {
    program: String,
}

impl NotifySend {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments for showing `payload`. With `wait` the program blocks until
    /// the notification is closed and prints the invoked action.
    pub fn arguments(payload: &NotificationPayload, wait: bool) -> Vec<String> {
        let mut args = vec![payload.title.clone(), payload.body.clone()];
        if let Some(ref image) = payload.image {
            args.push("-i".to_string());
            args.push(image.display().to_string());
        }
        if wait {
            args.push("-w".to_string());
            args.push(format!("--action={}={}", DEFAULT_ACTION, DEFAULT_ACTION));
        }
        args
    }

    async fn show(&self, payload: &NotificationPayload) -> Result<()> {
        let status = Command::new(&self.program)
            .args(Self::arguments(payload, false))
            .status()
            .await
            .map_err(|e| FeedNotifyError::Delivery(format!("{}: {}", self.program, e)))?;

        if !status.success() {
            return Err(FeedNotifyError::Delivery(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }

    /// Show the notification and wait for the user. Returns whether the
    /// default action was invoked.
    async fn show_and_wait(&self, payload: &NotificationPayload) -> Result<bool> {
        let output = Command::new(&self.program)
            .args(Self::arguments(payload, true))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| FeedNotifyError::Delivery(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(FeedNotifyError::Delivery(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(invoked_default(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn invoked_default(stdout: &str) -> bool {
    stdout.lines().any(|line| line.trim() == DEFAULT_ACTION)
}

/// Run a notification's click action without waiting for it to finish.
pub fn run_action(action: &Action) -> Result<()> {
    match action {
        Action::Command(command) => {
            let mut parts = command.split_whitespace();
            let program = parts
                .next()
                .ok_or_else(|| FeedNotifyError::Delivery("Empty action command".to_string()))?;
            Command::new(program)
                .args(parts)
                .spawn()
                .map_err(|e| FeedNotifyError::Delivery(format!("{}: {}", program, e)))?;
        }
        Action::OpenUrl(url) => {
            open::that_detached(url)
                .map_err(|e| FeedNotifyError::Delivery(format!("Failed to open {}: {}", url, e)))?;
        }
    }
    Ok(())
}

#[async_trait]
impl NotificationSink for NotifySend {
    async fn send(&self, payload: &NotificationPayload) -> Result<()> {
        let Some(ref action) = payload.default_action else {
            return self.show(payload).await;
        };

        if self.show_and_wait(payload).await? {
            tracing::debug!("Default action invoked for {:?}", payload.title);
            run_action(action)?;
        }
        Ok(())
    }
}
