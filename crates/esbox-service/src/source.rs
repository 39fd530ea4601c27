//! Listing source backed by the remote accessor.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use esbox_cache::{CacheKey, ListingSource};
use esbox_client::{ListQuery, RemoteApi};
use esbox_core::result::AppResult;
use esbox_entity::Listing;

/// Fetches the listing behind each cache key from the backend.
#[derive(Clone)]
pub struct RemoteListingSource {
    api: Arc<dyn RemoteApi>,
}

impl RemoteListingSource {
    /// Creates a source over the given accessor.
    pub fn new(api: Arc<dyn RemoteApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListingSource for RemoteListingSource {
    async fn fetch_listing(&self, key: &CacheKey) -> AppResult<Listing> {
        debug!(%key, "Fetching listing");
        match key {
            CacheKey::Root => self.api.list(ListQuery::Children(None)).await,
            CacheKey::Folder(id) => self.api.list(ListQuery::Children(Some(*id))).await,
            CacheKey::Starred => self.api.list(ListQuery::Starred).await,
            CacheKey::Trash => self.api.list_trash().await,
        }
    }
}
