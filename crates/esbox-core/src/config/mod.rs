//! Client configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section; every field has a default so an empty file is valid.

pub mod api;
pub mod cache;
pub mod logging;
pub mod notifications;
pub mod session;

use serde::{Deserialize, Serialize};

use self::api::ApiConfig;
use self::cache::CacheConfig;
use self::logging::LoggingConfig;
use self::notifications::NotificationConfig;
use self::session::SessionConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`ESBOX__API__BASE_URL`, ...).
pub const ENV_PREFIX: &str = "ESBOX";

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Session token persistence.
    #[serde(default)]
    pub session: SessionConfig,
    /// Listing cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Toast notification settings.
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `path`, an optional profile overlay next to it
    /// (`config/<profile>.toml`), and environment variables prefixed with
    /// `ESBOX__`. Missing files are skipped.
    pub fn load(path: &str, profile: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false));

        if let Some(profile) = profile {
            let overlay = std::path::Path::new(path)
                .parent()
                .map(|dir| dir.join(profile))
                .unwrap_or_else(|| std::path::PathBuf::from(profile));
            builder = builder.add_source(
                config::File::with_name(&overlay.to_string_lossy()).required(false),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ClientConfig::load("does/not/exist", None).unwrap();
        assert_eq!(config.api.api_prefix, "/api/v1");
        assert_eq!(config.cache.max_capacity, 1000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_profile_overlay_overrides_base() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("default.toml");
        let overlay = dir.path().join("staging.toml");
        let mut f = std::fs::File::create(&base).unwrap();
        writeln!(f, "[api]\nbase_url = \"http://base:8000\"\ntimeout_seconds = 5").unwrap();
        let mut f = std::fs::File::create(&overlay).unwrap();
        writeln!(f, "[api]\nbase_url = \"http://staging:8000\"").unwrap();

        let config =
            ClientConfig::load(&base.to_string_lossy(), Some("staging.toml")).unwrap();
        assert_eq!(config.api.base_url, "http://staging:8000");
        assert_eq!(config.api.timeout_seconds, 5);
    }
}
