//! Generic `{ "message": ... }` response body.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned by most mutating endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome; empty when the backend sent none.
    #[serde(default)]
    pub message: String,
}

impl MessageResponse {
    /// The backend message, or `fallback` when it is blank.
    pub fn or(&self, fallback: &str) -> String {
        if self.message.trim().is_empty() {
            fallback.to_string()
        } else {
            self.message.clone()
        }
    }
}
