//! Toast notification configuration.

use serde::{Deserialize, Serialize};

/// How long toasts stay visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Toast lifetime in seconds.
    #[serde(default = "default_lifetime")]
    pub lifetime_seconds: u64,
    /// Maximum number of toasts retained at once; oldest are dropped first.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            lifetime_seconds: default_lifetime(),
            max_visible: default_max_visible(),
        }
    }
}

fn default_lifetime() -> u64 {
    4
}

fn default_max_visible() -> usize {
    5
}
