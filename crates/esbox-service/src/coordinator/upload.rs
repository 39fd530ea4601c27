//! Local file upload with progress reporting.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use esbox_cache::{CacheKey, ListingCache};
use esbox_client::{FileUpload, ProgressFn, RemoteApi};
use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_core::types::FolderId;

use super::MutationOutcome;
use crate::notification::NotificationCenter;

/// Upload status shown by the upload dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    /// Nothing has been sent yet.
    Idle,
    /// Bytes are on the wire.
    Uploading,
    /// The backend accepted the file.
    Success,
    /// The upload failed; the dialog stays open.
    Error,
}

/// Snapshot of the current upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadProgress {
    /// Status.
    pub phase: UploadPhase,
    /// Bytes sent so far.
    pub sent: u64,
    /// Total bytes to send.
    pub total: u64,
}

impl UploadProgress {
    const IDLE: Self = Self {
        phase: UploadPhase::Idle,
        sent: 0,
        total: 0,
    };

    /// Whole-number percentage sent; an empty file counts as complete once sent.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return if self.phase == UploadPhase::Success { 100 } else { 0 };
        }
        ((self.sent.min(self.total) * 100) / self.total) as u8
    }
}

/// Uploads local files and refreshes the destination listing.
#[derive(Debug, Clone)]
pub struct UploadCoordinator {
    api: Arc<dyn RemoteApi>,
    cache: ListingCache,
    notifications: NotificationCenter,
    progress: Arc<watch::Sender<UploadProgress>>,
}

impl UploadCoordinator {
    /// Creates a new upload coordinator.
    pub fn new(
        api: Arc<dyn RemoteApi>,
        cache: ListingCache,
        notifications: NotificationCenter,
    ) -> Self {
        let (tx, _rx) = watch::channel(UploadProgress::IDLE);
        Self {
            api,
            cache,
            notifications,
            progress: Arc::new(tx),
        }
    }

    /// Watch upload progress.
    pub fn subscribe(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    /// The latest progress snapshot.
    pub fn progress(&self) -> UploadProgress {
        *self.progress.borrow()
    }

    /// Clear a finished upload back to idle.
    pub fn reset(&self) {
        self.progress.send_replace(UploadProgress::IDLE);
    }

    /// Upload the file at `path` into `parent_id`, optionally under another name.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn upload(
        &self,
        path: &Path,
        parent_id: Option<FolderId>,
        name: Option<&str>,
    ) -> AppResult<MutationOutcome> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(m) if m.is_file() => m,
            _ => {
                return Err(AppError::validation(format!(
                    "File not found: {}",
                    path.display()
                )));
            }
        };

        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => path
                .file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
                .ok_or_else(|| AppError::validation("Select a file to upload"))?,
        };
        let mime_type = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        let total = metadata.len();

        self.progress.send_replace(UploadProgress {
            phase: UploadPhase::Uploading,
            sent: 0,
            total,
        });

        let sender = Arc::clone(&self.progress);
        let report: ProgressFn = Arc::new(move |sent, total| {
            sender.send_replace(UploadProgress {
                phase: UploadPhase::Uploading,
                sent,
                total,
            });
        });

        let upload = FileUpload {
            path: path.to_path_buf(),
            name: name.clone(),
            parent_id,
            mime_type,
            size: total,
            progress: Some(report),
        };

        match self.api.upload_file(upload).await {
            Ok(resp) => {
                self.progress.send_replace(UploadProgress {
                    phase: UploadPhase::Success,
                    sent: total,
                    total,
                });
                self.cache.invalidate(&CacheKey::for_parent(parent_id));
                let message = resp.or("File uploaded");
                info!(%name, bytes = total, "Upload complete");
                self.notifications.success(message.clone());
                Ok(MutationOutcome::Applied { message })
            }
            Err(err) => {
                let sent = self.progress().sent;
                self.progress.send_replace(UploadProgress {
                    phase: UploadPhase::Error,
                    sent,
                    total,
                });
                warn!(%name, error = %err.message, "Upload failed");
                self.notifications.error(err.message.clone());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esbox_entity::Listing;

    use crate::testing::{FakeApi, harness};

    #[test]
    fn test_percent() {
        let p = UploadProgress {
            phase: UploadPhase::Uploading,
            sent: 50,
            total: 200,
        };
        assert_eq!(p.percent(), 25);
        assert_eq!(UploadProgress::IDLE.percent(), 0);
    }

    #[tokio::test]
    async fn test_upload_marks_parent_stale() {
        let api = FakeApi::new();
        let key = CacheKey::Folder(FolderId(42));
        api.put_listing(key, Listing::default());
        let h = harness(&api);
        h.cache.read(&key).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        tokio::fs::write(&path, vec![0u8; 300]).await.unwrap();

        let outcome = h
            .uploads
            .upload(&path, Some(FolderId(42)), None)
            .await
            .unwrap();
        assert_eq!(outcome.message(), Some("File uploaded"));

        let progress = h.uploads.progress();
        assert_eq!(progress.phase, UploadPhase::Success);
        assert_eq!(progress.percent(), 100);
        assert!(h.cache.is_stale(&key));
        assert_eq!(
            api.calls().last().map(String::as_str),
            Some("upload_file:photo.png:image/png:42")
        );
    }

    #[tokio::test]
    async fn test_missing_file_rejected_locally() {
        let api = FakeApi::new();
        let h = harness(&api);
        let err = h
            .uploads
            .upload(Path::new("/definitely/not/here.txt"), None, None)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(api.calls().is_empty());
        assert_eq!(h.uploads.progress().phase, UploadPhase::Idle);
    }

    #[tokio::test]
    async fn test_failed_upload_reports_error_phase() {
        let api = FakeApi::new();
        let h = harness(&api);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();
        api.fail_next(AppError::backend("Storage quota exceeded"));

        let err = h.uploads.upload(&path, None, Some("renamed.txt")).await.unwrap_err();
        assert_eq!(err.message, "Storage quota exceeded");
        assert_eq!(h.uploads.progress().phase, UploadPhase::Error);
        assert_eq!(h.notifications.drain()[0].message, "Storage quota exceeded");

        h.uploads.reset();
        assert_eq!(h.uploads.progress(), UploadProgress::IDLE);
    }
}
