use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

/// A user-facing notification. Display and auto-dismiss timing belong to
/// whatever sink renders it.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, message: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str);
}

/// Sink that forwards notifications over a channel, for front-ends that
/// render them elsewhere (the console client, tests).
pub struct ChannelNotificationSink {
    sender: UnboundedSender<Notification>,
}

impl ChannelNotificationSink {
    pub fn new(sender: UnboundedSender<Notification>) -> Self {
        Self { sender }
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str) {
        // Receiver may be gone during shutdown; nothing to do then.
        let _ = self.sender.send(Notification::new(kind, title, message));
    }
}
