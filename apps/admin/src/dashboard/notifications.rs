use std::fmt::Display;

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

/// Outcome side-channel for the views. Every push is also logged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Notifications(Vec<Notification>);

impl Notifications {
    pub fn success(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        info!("{title}: {message}");
        self.push(NotificationKind::Success, title, message);
    }

    pub fn error(&mut self, title: &str, error: &impl Display) {
        let message = error.to_string();
        warn!("{title}: {message}");
        self.push(NotificationKind::Error, title, message);
    }

    fn push(&mut self, kind: NotificationKind, title: &str, message: String) {
        self.0.push(Notification {
            kind,
            title: title.to_string(),
            message,
        });
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Notification> {
        self.0.last()
    }

    #[cfg(test)]
    pub fn has_errors(&self) -> bool {
        self.0.iter().any(|n| n.kind == NotificationKind::Error)
    }
}
