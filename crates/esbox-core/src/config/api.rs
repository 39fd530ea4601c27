//! Backend API configuration.

use serde::{Deserialize, Serialize};

/// Where and how the client reaches the ESBox backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path prefix shared by every endpoint.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Request timeout in seconds (applies to JSON calls, not streams).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Base URL including the API prefix, without a trailing slash.
    pub fn root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix.trim_matches('/')
        )
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_normalises_slashes() {
        let cfg = ApiConfig {
            base_url: "http://host:8000/".to_string(),
            api_prefix: "/api/v1/".to_string(),
            timeout_seconds: 1,
        };
        assert_eq!(cfg.root(), "http://host:8000/api/v1");
    }
}
