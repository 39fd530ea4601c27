//! Folder create, rename, delete, and star.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::instrument;

use esbox_cache::{CacheKey, ListingCache, ListingPatch};
use esbox_client::RemoteApi;
use esbox_core::result::AppResult;
use esbox_core::types::FolderId;
use esbox_entity::{CreateFolder, Folder, FolderUpdate};

use super::{MutationOutcome, MutationPhase, Mutations, clean_name};
use crate::notification::NotificationCenter;

/// Runs folder mutations against the backend and patches the cached listing.
#[derive(Debug, Clone)]
pub struct FolderCoordinator {
    api: Arc<dyn RemoteApi>,
    mutations: Mutations,
}

impl FolderCoordinator {
    /// Creates a new folder coordinator.
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

    /// Create a folder named `name` under `parent_id`.
    ///
    /// The folder returned by the backend is inserted into the parent's
    /// listing; when the backend does not return it the listing is marked
    /// stale instead.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        parent_id: Option<FolderId>,
        name: &str,
    ) -> AppResult<MutationOutcome> {
        const OP: &str = "create_folder";
        self.mutations.validating(OP);
        let name = clean_name(name, "Folder").map_err(|e| self.mutations.reject(OP, e))?;

        let req = CreateFolder {
            name: name.to_string(),
            parent_id,
        };
        let created = self
            .mutations
            .remote(OP, self.api.create_folder(&req))
            .await?;

        let key = CacheKey::for_parent(parent_id);
        match created.folder {
            Some(folder) => {
                self.mutations
                    .patch(&key, &ListingPatch::InsertFolder(folder))
                    .await;
            }
            None => self.mutations.cache().invalidate(&key),
        }

        let message = if created.message.trim().is_empty() {
            "Folder created".to_string()
        } else {
            created.message
        };
        Ok(self.mutations.applied(OP, message))
    }

    /// Rename `folder`, shown in the `view` listing.
    #[instrument(skip(self, folder), fields(folder_id = %folder.id))]
    pub async fn rename(
        &self,
        view: &CacheKey,
        folder: &Folder,
        new_name: &str,
    ) -> AppResult<MutationOutcome> {
        const OP: &str = "rename_folder";
        self.mutations.validating(OP);
        let name = clean_name(new_name, "Folder").map_err(|e| self.mutations.reject(OP, e))?;
        if name == folder.name.trim() {
            return Ok(self.mutations.no_op(OP));
        }

        let resp = self
            .mutations
            .remote(OP, self.api.update_folder(folder.id, &FolderUpdate::rename(name)))
            .await?;

        let key = CacheKey::for_entity(view, folder.parent_id);
        let patch = ListingPatch::RenameFolder {
            id: folder.id,
            name: name.to_string(),
        };
        self.mutations.patch(&key, &patch).await;
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(folder.parent_id));
        if folder.is_starred {
            self.mutations.invalidate_other(&key, &CacheKey::Starred);
        }
        Ok(self.mutations.applied(OP, resp.or("Folder renamed")))
    }

    /// Move `folder` (and its contents) to the trash.
    #[instrument(skip(self, folder), fields(folder_id = %folder.id))]
    pub async fn delete(&self, view: &CacheKey, folder: &Folder) -> AppResult<MutationOutcome> {
        const OP: &str = "delete_folder";
        self.mutations.validating(OP);
        let resp = self
            .mutations
            .remote(OP, self.api.delete_folder(folder.id))
            .await?;

        let key = CacheKey::for_entity(view, folder.parent_id);
        self.mutations
            .patch(&key, &ListingPatch::RemoveFolder(folder.id))
            .await;
        self.mutations.invalidate_other(&key, &CacheKey::Trash);
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(folder.parent_id));
        if folder.is_starred {
            self.mutations.invalidate_other(&key, &CacheKey::Starred);
        }
        Ok(self.mutations.applied(OP, resp.or("Folder moved to trash")))
    }

    /// Flip the starred flag of `folder`.
    #[instrument(skip(self, folder), fields(folder_id = %folder.id))]
    pub async fn toggle_star(
        &self,
        view: &CacheKey,
        folder: &Folder,
    ) -> AppResult<MutationOutcome> {
        const OP: &str = "star_folder";
        self.mutations.validating(OP);
        let starred = !folder.is_starred;
        let resp = self
            .mutations
            .remote(OP, self.api.update_folder(folder.id, &FolderUpdate::star(starred)))
            .await?;

        let key = CacheKey::for_entity(view, folder.parent_id);
        self.mutations
            .patch(
                &key,
                &ListingPatch::StarFolder {
                    id: folder.id,
                    starred,
                },
            )
            .await;
        self.mutations.invalidate_other(&key, &CacheKey::Starred);
        self.mutations
            .invalidate_other(&key, &CacheKey::for_parent(folder.parent_id));

        let fallback = if starred {
            "Added to starred"
        } else {
            "Removed from starred"
        };
        Ok(self.mutations.applied(OP, resp.or(fallback)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esbox_core::error::ErrorKind;
    use esbox_entity::Listing;

    use crate::testing::{FakeApi, folder, harness};

    #[tokio::test]
    async fn test_create_inserts_returned_folder() {
        let api = FakeApi::new();
        api.put_listing(CacheKey::Root, Listing::new(vec![folder(1, "a", 0, false)], vec![]));
        let h = harness(&api);
        h.cache.read(&CacheKey::Root).await.unwrap();

        let outcome = h.folders.create(None, "  photos ").await.unwrap();
        assert_eq!(outcome.message(), Some("Folder created"));

        let listing = h.cache.peek(&CacheKey::Root).await.unwrap();
        let names: Vec<_> = listing.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "photos"]);
        assert_eq!(api.count("list"), 1);
        assert_eq!(api.calls().last().map(String::as_str), Some("create_folder:photos"));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let api = FakeApi::new();
        let h = harness(&api);
        let err = h.folders.create(Some(FolderId(3)), "").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Folder name cannot be empty");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_rename_unchanged_is_noop() {
        let api = FakeApi::new();
        let h = harness(&api);
        let f = folder(5, "docs", 0, false);
        let outcome = h.folders.rename(&CacheKey::Root, &f, "docs  ").await.unwrap();
        assert_eq!(outcome, MutationOutcome::NoOp);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_and_invalidates_trash() {
        let api = FakeApi::new();
        let key = CacheKey::Folder(FolderId(9));
        api.put_listing(
            key,
            Listing::new(vec![folder(5, "docs", 9, false), folder(6, "pics", 9, false)], vec![]),
        );
        api.put_listing(CacheKey::Trash, Listing::default());
        let h = harness(&api);
        h.cache.read(&key).await.unwrap();
        h.cache.read(&CacheKey::Trash).await.unwrap();

        let outcome = h
            .folders
            .delete(&key, &folder(5, "docs", 9, false))
            .await
            .unwrap();
        assert!(outcome.is_applied());
        let listing = h.cache.peek(&key).await.unwrap();
        assert!(listing.folder(FolderId(5)).is_none());
        assert!(listing.folder(FolderId(6)).is_some());
        assert!(h.cache.is_stale(&CacheKey::Trash));
        assert_eq!(h.notifications.drain()[0].message, "Folder moved to trash");
    }

    #[tokio::test]
    async fn test_star_in_folder_view_keeps_entry() {
        let api = FakeApi::new();
        api.put_listing(CacheKey::Root, Listing::new(vec![folder(5, "docs", 0, false)], vec![]));
        let h = harness(&api);
        h.cache.read(&CacheKey::Root).await.unwrap();

        let outcome = h
            .folders
            .toggle_star(&CacheKey::Root, &folder(5, "docs", 0, false))
            .await
            .unwrap();
        assert_eq!(outcome.message(), Some("Added to starred"));
        assert!(h.cache.peek(&CacheKey::Root).await.unwrap().folders[0].is_starred);
        assert_eq!(api.calls().last().map(String::as_str), Some("update_folder:5"));
    }
}
