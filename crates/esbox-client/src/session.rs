//! Bearer token persistence.
//!
//! The token obtained at login is kept in memory and mirrored to a file so
//! the next run of the client is still signed in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use esbox_core::result::AppResult;

/// Shared holder of the current bearer token.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    /// File mirroring the token; `None` keeps it in memory only.
    path: Option<PathBuf>,
    token: Arc<RwLock<Option<String>>>,
}

impl TokenStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading any token saved by a previous run.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let token = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), has_token = token.is_some(), "Session store opened");

        Ok(Self {
            path: Some(path),
            token: Arc::new(RwLock::new(token)),
        })
    }

    /// The current token, if signed in.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Replace the token and persist it.
    pub async fn set(&self, token: impl Into<String>) -> AppResult<()> {
        let token = token.into();
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, &token).await?;
            restrict_permissions(path).await?;
        }
        *self.token.write().await = Some(token);
        Ok(())
    }

    /// Forget the token and remove the persisted copy.
    pub async fn clear(&self) -> AppResult<()> {
        *self.token.write().await = None;
        if let Some(path) = &self.path {
            match tokio::fs::remove_file(path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> AppResult<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> AppResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session").join("token");

        let store = TokenStore::open(&path).await.unwrap();
        assert_eq!(store.get().await, None);
        store.set("abc123").await.unwrap();

        let reopened = TokenStore::open(&path).await.unwrap();
        assert_eq!(reopened.get().await.as_deref(), Some("abc123"));

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        reopened.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = TokenStore::in_memory();
        store.set("t").await.unwrap();
        let clone = store.clone();
        assert_eq!(clone.get().await.as_deref(), Some("t"));
    }
}
