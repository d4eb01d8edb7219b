//! Toast notifications for the GUI
//!
//! Short-lived messages such as "Address copied" or a failed browser launch.

use std::collections::VecDeque;
use std::time::Duration;

/// How many notifications are kept before the oldest is dropped.
pub const MAX_NOTIFICATIONS: usize = 20;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A notification entry with message and timestamp
#[derive(Clone, Debug)]
pub struct NotificationEntry {
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            timestamp: chrono::Local::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            ..Self::new(message)
        }
    }

    /// Whether the toast should still be visible at `now`.
    pub fn is_fresh(&self, now: chrono::DateTime<chrono::Local>) -> bool {
        now.signed_duration_since(self.timestamp)
            .to_std()
            .map(|age| age < TOAST_DURATION)
            .unwrap_or(true)
    }
}

/// Append `entry`, dropping the oldest past [`MAX_NOTIFICATIONS`].
pub fn push_notification(queue: &mut VecDeque<NotificationEntry>, entry: NotificationEntry) {
    match entry.level {
        NotificationLevel::Info => tracing::debug!("{}", entry.message),
        NotificationLevel::Error => tracing::warn!("{}", entry.message),
    }
    queue.push_back(entry);
    while queue.len() > MAX_NOTIFICATIONS {
        queue.pop_front();
    }
}
