//! File rename, delete, star, and move.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use esbox_cache::{CacheKey, ListingCache, ListingPatch};
use esbox_client::RemoteApi;
use esbox_core::result::AppResult;
use esbox_core::types::FolderId;
use esbox_entity::{File, FileAction};

use super::{MutationOutcome, MutationPhase, Mutations, clean_name};
use crate::notification::NotificationCenter;

/// Runs file mutations against the backend and patches the cached listing.
#[derive(Debug, Clone)]
pub struct FileCoordinator {
    api: Arc<dyn RemoteApi>,
    mutations: Mutations,
}

impl FileCoordinator {
    /// Creates a new file coordinator.
    pub fn new(
        api: Arc<dyn RemoteApi>,
        cache: ListingCache,
        notifications: NotificationCenter,
    ) -> Self {
        Self {
            api,
            mutations: Mutations::new(cache, notifications),
        }
    }

    /// Watch the phase of the current action.
    pub fn subscribe(&self) -> watch::Receiver<MutationPhase> {
        self.mutations.subscribe()
    }

    /// Phase of the most recent action.
    pub fn phase(&self) -> MutationPhase {
        self.mutations.phase()
    }

    /// Rename `file`, shown in the `view` listing.
    #[instrument(skip(self, file), fields(file_id = %file.id))]
    pub async fn rename(
        &self,
        view: &CacheKey,
        file: &File,
        new_name: &str,
    ) -> AppResult<MutationOutcome> {
        const OP: &str = "rename_file";
        self.mutations.validating(OP);
        let name = clean_name(new_name, "File").map_err(|e| self.mutations.reject(OP, e))?;
        if name == file.filename.trim() {
            return Ok(self.mutations.no_op(OP));
        }

        let action = FileAction::Rename {
            new_name: name.to_string(),
        };
        let resp = self
            .mutations
            .remote(OP, self.api.update_file(file.id, &action))
            .await?;

        let key = CacheKey::for_entity(view, file.parent_id);
        let patch = ListingPatch::RenameFile {
            id: file.id,
            filename: name.to_string(),
        };
        self.mutations.patch(&key, &patch).await;
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(file.parent_id));
        if file.is_starred {
            self.mutations.invalidate_other(&key, &CacheKey::Starred);
        }
        Ok(self.mutations.applied(OP, resp.or("File renamed")))
    }

    /// Move `file` to the trash.
    #[instrument(skip(self, file), fields(file_id = %file.id))]
    pub async fn delete(&self, view: &CacheKey, file: &File) -> AppResult<MutationOutcome> {
        const OP: &str = "delete_file";
        self.mutations.validating(OP);
        let resp = self
            .mutations
            .remote(OP, self.api.update_file(file.id, &FileAction::Delete))
            .await?;

        let key = CacheKey::for_entity(view, file.parent_id);
        self.mutations
            .patch(&key, &ListingPatch::RemoveFile(file.id))
            .await;
        self.mutations.invalidate_other(&key, &CacheKey::Trash);
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(file.parent_id));
        if file.is_starred {
            self.mutations.invalidate_other(&key, &CacheKey::Starred);
        }
        Ok(self.mutations.applied(OP, resp.or("File moved to trash")))
    }

    /// Flip the starred flag of `file`.
    #[instrument(skip(self, file), fields(file_id = %file.id))]
    pub async fn toggle_star(&self, view: &CacheKey, file: &File) -> AppResult<MutationOutcome> {
        const OP: &str = "star_file";
        self.mutations.validating(OP);
        let starred = !file.is_starred;
        let resp = self
            .mutations
            .remote(OP, self.api.update_file(file.id, &FileAction::set_starred(starred)))
            .await?;

        let key = CacheKey::for_entity(view, file.parent_id);
        self.mutations
            .patch(
                &key,
                &ListingPatch::StarFile {
                    id: file.id,
                    starred,
                },
            )
            .await;
        self.mutations.invalidate_other(&key, &CacheKey::Starred);
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(file.parent_id));

        let fallback = if starred {
            "Added to starred"
        } else {
            "Removed from starred"
        };
        Ok(self.mutations.applied(OP, resp.or(fallback)))
    }

    /// Move `file` into `target` (`None` for the top level).
    #[instrument(skip(self, file), fields(file_id = %file.id))]
    pub async fn move_to(
        &self,
        view: &CacheKey,
        file: &File,
        target: Option<FolderId>,
    ) -> AppResult<MutationOutcome> {
        const OP: &str = "move_file";
        self.mutations.validating(OP);
        if target == file.parent_id {
            return Ok(self.mutations.no_op(OP));
        }

        let action = FileAction::Move { parent_id: target };
        let resp = self
            .mutations
            .remote(OP, self.api.update_file(file.id, &action))
            .await?;

        let key = CacheKey::for_entity(view, file.parent_id);
        let patch = if key.is_virtual() {
            ListingPatch::ReplaceFile(File {
                parent_id: target,
                ..file.clone()
            })
        } else {
            ListingPatch::RemoveFile(file.id)
        };
        self.mutations.patch(&key, &patch).await;
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(file.parent_id));
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(target));
        Ok(self.mutations.applied(OP, resp.or("File moved")))
    }
}
