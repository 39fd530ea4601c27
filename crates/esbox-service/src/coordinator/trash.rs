//! Restoring and permanently deleting trashed items.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, instrument};

use esbox_cache::{CacheKey, ListingCache, ListingPatch};
use esbox_client::RemoteApi;
use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId};
use esbox_entity::{ItemType, Listing, TrashItem};

use super::{MutationOutcome, MutationPhase, Mutations};
use crate::notification::NotificationCenter;

/// Runs trash actions and keeps the trash listing in step.
#[derive(Debug, Clone)]
pub struct TrashCoordinator {
    api: Arc<dyn RemoteApi>,
    mutations: Mutations,
}

fn removal(item: &TrashItem) -> ListingPatch {
    match item.item_type {
        ItemType::File => ListingPatch::RemoveFile(FileId(item.item_id)),
        ItemType::Folder => ListingPatch::RemoveFolder(FolderId(item.item_id)),
    }
}

/// Parent folder the trashed entity lived in, if the trash listing knows it.
fn parent_of(listing: &Listing, item: &TrashItem) -> Option<Option<FolderId>> {
    match item.item_type {
        ItemType::File => listing.file(FileId(item.item_id)).map(|f| f.parent_id),
        ItemType::Folder => listing.folder(FolderId(item.item_id)).map(|f| f.parent_id),
    }
}

impl TrashCoordinator {
    /// Creates a new trash coordinator.
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

    /// Put an item back where it was.
    #[instrument(skip(self))]
    pub async fn restore(&self, item: &TrashItem) -> AppResult<MutationOutcome> {
        const OP: &str = "restore";
        self.mutations.validating(OP);
        let resp = self
            .mutations
            .remote(OP, self.api.restore_trash(item))
            .await?;

        let cache = self.mutations.cache();
        let parent = cache
            .peek(&CacheKey::Trash)
            .await
            .and_then(|listing| parent_of(&listing, item));
        self.mutations.patch(&CacheKey::Trash, &removal(item)).await;
        if let Some(parent_id) = parent {
            cache.invalidate(&CacheKey::for_parent(parent_id));
        }
        cache.invalidate(&CacheKey::Root);
        cache.invalidate(&CacheKey::Starred);
        Ok(self.mutations.applied(OP, resp.or("Item restored")))
    }

    /// Delete an item for good.
    #[instrument(skip(self))]
    pub async fn purge(&self, item: &TrashItem) -> AppResult<MutationOutcome> {
        const OP: &str = "purge";
        self.mutations.validating(OP);
        let resp = self
            .mutations
            .remote(OP, self.api.purge_trash(item))
            .await?;

        self.mutations.patch(&CacheKey::Trash, &removal(item)).await;
        Ok(self.mutations.applied(OP, resp.or("Item permanently deleted")))
    }

    /// Purge every item in the trash listing, stopping at the first failure.
    ///
    /// Returns the number of items deleted.
    pub async fn empty(&self) -> AppResult<usize> {
        let listing = self.mutations.cache().read(&CacheKey::Trash).await?;
        let items: Vec<TrashItem> = listing
            .folders
            .iter()
            .map(|f| TrashItem::folder(f.id))
            .chain(listing.files.iter().map(|f| TrashItem::file(f.id)))
            .collect();

        for item in &items {
            self.purge(item).await?;
        }
        info!(count = items.len(), "Trash emptied");
        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{FakeApi, file, folder, harness};

    fn trash() -> Listing {
        Listing::new(vec![folder(5, "old", 0, false)], vec![file(7, "f", 5, false)])
    }

    #[tokio::test]
    async fn test_restore_removes_from_trash_and_marks_root() {
        let api = FakeApi::new();
        api.put_listing(CacheKey::Trash, trash());
        api.put_listing(CacheKey::Root, Listing::default());
        let h = harness(&api);
        h.cache.read(&CacheKey::Trash).await.unwrap();
        h.cache.read(&CacheKey::Root).await.unwrap();

        h.trash.restore(&TrashItem::file(FileId(7))).await.unwrap();
        let listing = h.cache.peek(&CacheKey::Trash).await.unwrap();
        assert!(listing.files.is_empty());
        assert_eq!(listing.folders.len(), 1);
        assert!(h.cache.is_stale(&CacheKey::Root));
        assert_eq!(api.calls().last().map(String::as_str), Some("restore_trash:file:7"));
    }

    #[tokio::test]
    async fn test_restore_marks_original_parent_stale() {
        let api = FakeApi::new();
        api.put_listing(CacheKey::Trash, trash());
        let h = harness(&api);
        h.cache.read(&CacheKey::Trash).await.unwrap();
        h.cache.read(&CacheKey::Folder(FolderId(5))).await.unwrap();

        h.trash.restore(&TrashItem::file(FileId(7))).await.unwrap();
        assert!(h.cache.is_stale(&CacheKey::Folder(FolderId(5))));
    }

    #[tokio::test]
    async fn test_restore_unknown_parent_still_marks_root() {
        let api = FakeApi::new();
        let h = harness(&api);
        h.cache.read(&CacheKey::Root).await.unwrap();
        h.cache.read(&CacheKey::Folder(FolderId(5))).await.unwrap();

        h.trash.restore(&TrashItem::file(FileId(7))).await.unwrap();
        assert!(h.cache.is_stale(&CacheKey::Root));
        assert!(!h.cache.is_stale(&CacheKey::Folder(FolderId(5))));
    }

    #[tokio::test]
    async fn test_purge_failure_keeps_item() {
        let api = FakeApi::new();
        api.put_listing(CacheKey::Trash, trash());
        let h = harness(&api);
        h.cache.read(&CacheKey::Trash).await.unwrap();
        api.fail_next(esbox_core::AppError::not_found("Item not found in trash"));

        let err = h
            .trash
            .purge(&TrashItem::folder(FolderId(5)))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Item not found in trash");
        assert_eq!(h.cache.peek(&CacheKey::Trash).await.unwrap().folders.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_purges_everything() {
        let api = FakeApi::new();
        api.put_listing(CacheKey::Trash, trash());
        let h = harness(&api);

        assert_eq!(h.trash.empty().await.unwrap(), 2);
        assert!(h.cache.peek(&CacheKey::Trash).await.unwrap().is_empty());
        assert_eq!(api.count("purge_trash"), 2);
    }
}
