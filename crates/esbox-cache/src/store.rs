//! Keyed listing cache with read-through fetch and stale-while-revalidate.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashSet;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use tracing::{debug, warn};

use esbox_core::config::cache::CacheConfig;
use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_entity::Listing;

use crate::keys::CacheKey;

/// Where listings come from on a cache miss or revalidation.
#[async_trait]
pub trait ListingSource: Send + Sync + 'static {
    /// Fetch the current listing for a key from the backend.
    async fn fetch_listing(&self, key: &CacheKey) -> AppResult<Listing>;
}

/// Process-wide listing cache, owned by the application context.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct ListingCache {
    /// The underlying moka cache.
    entries: Cache<CacheKey, Arc<Listing>>,
    /// Keys whose entry should be refetched on next read.
    stale: Arc<DashSet<CacheKey>>,
    /// Keys with a background refetch in flight.
    refreshing: Arc<DashSet<CacheKey>>,
    /// Bumped by `clear`; fetches started under an older generation are discarded.
    generation: Arc<AtomicU64>,
    /// Fetches listings on miss.
    source: Arc<dyn ListingSource>,
}

impl fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingCache")
            .field("entries", &self.entries.entry_count())
            .field("stale", &self.stale.len())
            .field("generation", &self.generation())
            .finish()
    }
}

impl ListingCache {
    /// Create a cache from configuration.
    pub fn new(config: &CacheConfig, source: Arc<dyn ListingSource>) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self {
            entries,
            stale: Arc::new(DashSet::new()),
            refreshing: Arc::new(DashSet::new()),
            generation: Arc::new(AtomicU64::new(0)),
            source,
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Return the cached listing, fetching it on a miss.
    ///
    /// Concurrent misses for the same key share one fetch. A stale entry is
    /// returned as-is while a single background refetch replaces it.
    /// Failed fetches are not cached.
    pub async fn read(&self, key: &CacheKey) -> AppResult<Arc<Listing>> {
        if let Some(listing) = self.entries.get(key).await {
            if self.stale.contains(key) {
                self.spawn_refresh(*key);
            }
            debug!(%key, "Listing cache hit");
            return Ok(listing);
        }

        debug!(%key, "Listing cache miss");
        let generation = self.generation();
        let source = Arc::clone(&self.source);
        let fetch_key = *key;
        let listing = self
            .entries
            .try_get_with(*key, async move {
                source.fetch_listing(&fetch_key).await.map(Arc::new)
            })
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())?;

        if self.generation() != generation {
            self.entries.invalidate(key).await;
            debug!(%key, "Dropped listing fetched before clear");
            return Ok(listing);
        }
        self.stale.remove(key);
        Ok(listing)
    }

    /// Return the cached listing without fetching.
    pub async fn peek(&self, key: &CacheKey) -> Option<Arc<Listing>> {
        self.entries.get(key).await
    }

    /// Atomically replace the cached listing with `transform(&listing)`.
    ///
    /// Returns `false` without touching the network when the key has no
    /// entry: there is nothing to update.
    pub async fn patch<F>(&self, key: &CacheKey, transform: F) -> bool
    where
        F: FnOnce(&Listing) -> Listing + Send,
    {
        let result = self
            .entries
            .entry(*key)
            .and_compute_with(|current| async move {
                match current {
                    Some(entry) => Op::Put(Arc::new(transform(entry.value()))),
                    None => Op::Nop,
                }
            })
            .await;

        let applied = matches!(result, CompResult::ReplacedWith(_));
        if applied {
            debug!(%key, "Listing patched in place");
        } else {
            debug!(%key, "Patch skipped: listing not cached");
        }
        applied
    }

    /// Mark a cached listing stale so the next read refetches it in the background.
    pub fn invalidate(&self, key: &CacheKey) {
        if self.entries.contains_key(key) {
            self.stale.insert(*key);
            debug!(%key, "Listing marked stale");
        }
    }

    /// Whether the key is currently marked stale.
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.stale.contains(key)
    }

    /// Refetch in the foreground and replace the entry wholesale.
    pub async fn revalidate(&self, key: &CacheKey) -> AppResult<Arc<Listing>> {
        let generation = self.generation();
        let listing = Arc::new(self.source.fetch_listing(key).await?);
        if self.generation() != generation {
            return Ok(listing);
        }
        self.entries.insert(*key, Arc::clone(&listing)).await;
        self.stale.remove(key);
        debug!(%key, "Listing revalidated");
        Ok(listing)
    }

    /// Drop every entry (used on logout).
    ///
    /// Fetches still in flight complete but never repopulate the cache.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate_all();
        self.stale.clear();
        self.refreshing.clear();
    }

    fn spawn_refresh(&self, key: CacheKey) {
        if !self.refreshing.insert(key) {
            return;
        }

        let this = self.clone();
        let generation = self.generation();
        tokio::spawn(async move {
            let result = this.source.fetch_listing(&key).await;
            if this.generation() != generation {
                debug!(%key, "Discarding background revalidation from before clear");
                return;
            }
            match result {
                Ok(listing) => {
                    this.entries.insert(key, Arc::new(listing)).await;
                    this.stale.remove(&key);
                    debug!(%key, "Background revalidation complete");
                }
                Err(e) => {
                    warn!(%key, error = %e, "Background revalidation failed");
                }
            }
            this.refreshing.remove(&key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use esbox_core::types::{FileId, FolderId};
    use esbox_entity::File;

    use crate::transform::ListingPatch;

    /// Returns a listing with one file named `v<n>` where n counts fetches.
    #[derive(Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail_first: bool,
        delay_ms: u64,
    }

    #[async_trait]
    impl ListingSource for CountingSource {
        async fn fetch_listing(&self, _key: &CacheKey) -> AppResult<Listing> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.fail_first && n == 1 {
                return Err(AppError::transport("connection refused"));
            }
            Ok(Listing::new(
                vec![],
                vec![File {
                    id: FileId(7),
                    filename: format!("v{n}"),
                    parent_id: Some(FolderId(42)),
                    mime_type: None,
                    file_size: 1,
                    is_starred: false,
                    uploaded_at: None,
                    updated_at: None,
                }],
            ))
        }
    }

    fn make_cache(source: Arc<CountingSource>) -> ListingCache {
        let config = CacheConfig {
            max_capacity: 100,
            time_to_live_seconds: 60,
        };
        ListingCache::new(&config, source)
    }

    const KEY: CacheKey = CacheKey::Folder(FolderId(42));

    #[tokio::test]
    async fn test_read_through_then_hit() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(Arc::clone(&source));

        let first = cache.read(&KEY).await.unwrap();
        let second = cache.read(&KEY).await.unwrap();
        assert_eq!(first.files[0].filename, "v1");
        assert_eq!(second.files[0].filename, "v1");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let source = Arc::new(CountingSource {
            delay_ms: 30,
            ..Default::default()
        });
        let cache = make_cache(Arc::clone(&source));

        let (a, b, c) = tokio::join!(cache.read(&KEY), cache.read(&KEY), cache.read(&KEY));
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_patch_on_missing_key_is_silent_noop() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(Arc::clone(&source));

        let applied = cache
            .patch(&KEY, |l| ListingPatch::RemoveFile(FileId(7)).apply(l))
            .await;
        assert!(!applied);
        assert!(cache.peek(&KEY).await.is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_patch_replaces_without_refetch() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(Arc::clone(&source));
        cache.read(&KEY).await.unwrap();

        let applied = cache
            .patch(&KEY, |l| ListingPatch::RemoveFile(FileId(7)).apply(l))
            .await;
        assert!(applied);

        let listing = cache.read(&KEY).await.unwrap();
        assert!(listing.file(FileId(7)).is_none());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let source = Arc::new(CountingSource {
            fail_first: true,
            ..Default::default()
        });
        let cache = make_cache(Arc::clone(&source));

        let err = cache.read(&KEY).await.unwrap_err();
        assert_eq!(err.message, "connection refused");
        let listing = cache.read(&KEY).await.unwrap();
        assert_eq!(listing.files[0].filename, "v2");
    }

    #[tokio::test]
    async fn test_invalidate_serves_stale_then_refreshes() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(Arc::clone(&source));
        cache.read(&KEY).await.unwrap();

        cache.invalidate(&KEY);
        assert!(cache.is_stale(&KEY));

        let stale = cache.read(&KEY).await.unwrap();
        assert_eq!(stale.files[0].filename, "v1");

        for _ in 0..100 {
            if !cache.is_stale(&KEY) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        let fresh = cache.peek(&KEY).await.unwrap();
        assert_eq!(fresh.files[0].filename, "v2");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_missing_key_marks_nothing() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(source);
        cache.invalidate(&CacheKey::Trash);
        assert!(!cache.is_stale(&CacheKey::Trash));
    }

    #[tokio::test]
    async fn test_revalidate_replaces_patched_listing() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(Arc::clone(&source));
        cache.read(&KEY).await.unwrap();
        cache
            .patch(&KEY, |l| ListingPatch::RemoveFile(FileId(7)).apply(l))
            .await;

        let listing = cache.revalidate(&KEY).await.unwrap();
        assert_eq!(listing.files[0].filename, "v2");
        assert_eq!(cache.peek(&KEY).await.unwrap().files.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let source = Arc::new(CountingSource::default());
        let cache = make_cache(Arc::clone(&source));
        cache.read(&KEY).await.unwrap();
        cache.clear();
        assert!(cache.peek(&KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_in_flight_does_not_survive_clear() {
        let source = Arc::new(CountingSource {
            delay_ms: 50,
            ..Default::default()
        });
        let cache = make_cache(Arc::clone(&source));
        cache.read(&KEY).await.unwrap();
        cache.invalidate(&KEY);
        cache.read(&KEY).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        cache.clear();
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert!(cache.peek(&KEY).await.is_none());
        assert!(!cache.is_stale(&KEY));
    }

    #[tokio::test]
    async fn test_read_after_clear_fetches_again() {
        let source = Arc::new(CountingSource {
            delay_ms: 50,
            ..Default::default()
        });
        let cache = make_cache(Arc::clone(&source));
        cache.read(&KEY).await.unwrap();
        cache.invalidate(&KEY);
        cache.read(&KEY).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        cache.clear();

        let listing = cache.read(&KEY).await.unwrap();
        assert_eq!(listing.files[0].filename, "v3");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(cache.peek(&KEY).await.unwrap().files[0].filename, "v3");
    }
}
