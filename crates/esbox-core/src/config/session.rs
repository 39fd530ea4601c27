//! Session token persistence configuration.

use serde::{Deserialize, Serialize};

/// Where the bearer token obtained at login is stored between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the token file.
    #[serde(default = "default_token_file")]
    pub token_file: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

fn default_token_file() -> String {
    "data/session/access_token".to_string()
}
