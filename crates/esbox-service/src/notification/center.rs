//! Toast queue with expiry.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use esbox_core::config::notifications::NotificationConfig;

/// Upper bound on toast lifetime (one day).
const MAX_LIFETIME_SECONDS: u64 = 86_400;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// A mutation was applied.
    Success,
    /// Something failed.
    Error,
    /// Neutral information.
    Info,
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    /// Toast ID.
    pub id: Uuid,
    /// Severity.
    pub level: ToastLevel,
    /// Text shown to the user.
    pub message: String,
    /// When it was raised.
    pub created_at: DateTime<Utc>,
}

/// Shared toast queue. Clones share the same queue.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
    lifetime: Duration,
    max_visible: usize,
}

impl NotificationCenter {
    /// Creates a notification center from configuration.
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            toasts: Arc::new(Mutex::new(VecDeque::new())),
            lifetime: Duration::seconds(config.lifetime_seconds.min(MAX_LIFETIME_SECONDS) as i64),
            max_visible: config.max_visible.max(1),
        }
    }

    /// Raise a success toast.
    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Success, message.into())
    }

    /// Raise an error toast.
    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Error, message.into())
    }

    /// Raise an informational toast.
    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.push(ToastLevel::Info, message.into())
    }

    /// Toasts that have not yet expired, oldest first.
    pub fn visible(&self) -> Vec<Toast> {
        self.visible_at(Utc::now())
    }

    /// Toasts still alive at `now`; expired ones are dropped.
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<Toast> {
        let mut toasts = self.lock();
        toasts.retain(|t| now - t.created_at < self.lifetime);
        toasts.iter().cloned().collect()
    }

    /// Remove and return every pending toast that has not expired.
    pub fn drain(&self) -> Vec<Toast> {
        self.drain_at(Utc::now())
    }

    /// Remove every pending toast, returning those still alive at `now`.
    pub fn drain_at(&self, now: DateTime<Utc>) -> Vec<Toast> {
        self.lock()
            .drain(..)
            .filter(|t| now - t.created_at < self.lifetime)
            .collect()
    }

    /// Dismiss one toast.
    pub fn dismiss(&self, id: Uuid) {
        self.lock().retain(|t| t.id != id);
    }

    fn push(&self, level: ToastLevel, message: String) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            level,
            message,
            created_at: Utc::now(),
        };
        let id = toast.id;

        let mut toasts = self.lock();
        toasts.push_back(toast);
        while toasts.len() > self.max_visible {
            toasts.pop_front();
        }
        id
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center(max_visible: usize) -> NotificationCenter {
        NotificationCenter::new(&NotificationConfig {
            lifetime_seconds: 4,
            max_visible,
        })
    }

    #[test]
    fn test_toasts_expire_after_lifetime() {
        let center = center(5);
        center.success("Folder created");
        let now = Utc::now();
        assert_eq!(center.visible_at(now).len(), 1);
        assert!(center.visible_at(now + Duration::seconds(5)).is_empty());
        assert!(center.drain().is_empty());
    }

    #[test]
    fn test_drain_skips_expired_toasts() {
        let center = center(5);
        center.error("Upload failed");
        let later = Utc::now() + Duration::seconds(5);
        assert!(center.drain_at(later).is_empty());

        center.success("Folder created");
        let drained = center.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].message, "Folder created");
        assert!(center.drain().is_empty());
    }

    #[test]
    fn test_oldest_dropped_beyond_capacity() {
        let center = center(2);
        center.info("one");
        center.error("two");
        center.success("three");
        let messages: Vec<_> = center.drain().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn test_dismiss_and_shared_clone() {
        let center = center(5);
        let shared = center.clone();
        let id = shared.error("boom");
        assert_eq!(center.visible()[0].level, ToastLevel::Error);
        center.dismiss(id);
        assert!(shared.visible().is_empty());
    }
}
