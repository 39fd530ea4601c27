//! The application context shared by every front-end surface.

use std::fmt;
use std::sync::Arc;

use tracing::info;

use esbox_cache::ListingCache;
use esbox_client::{HttpApiClient, RemoteApi, TokenStore};
use esbox_core::config::ClientConfig;
use esbox_core::result::AppResult;
use esbox_core::types::FileId;

use crate::auth::AuthStore;
use crate::coordinator::{FileCoordinator, FolderCoordinator, TrashCoordinator, UploadCoordinator};
use crate::dispatch::CommandDispatcher;
use crate::notification::NotificationCenter;
use crate::source::RemoteListingSource;
use crate::telegram::TelegramLink;

/// Owns the listing cache, the remote accessor, and the services built on them.
///
/// Cloning is cheap; clones share all state.
#[derive(Clone)]
pub struct AppContext {
    /// Loaded configuration.
    pub config: Arc<ClientConfig>,
    /// Remote accessor.
    pub api: Arc<dyn RemoteApi>,
    /// Bearer token store.
    pub tokens: TokenStore,
    /// Keyed listing cache.
    pub cache: ListingCache,
    /// Toast queue.
    pub notifications: NotificationCenter,
    /// Current user and authentication flows.
    pub auth: AuthStore,
    /// File mutations.
    pub files: FileCoordinator,
    /// Folder mutations.
    pub folders: FolderCoordinator,
    /// Uploads.
    pub uploads: UploadCoordinator,
    /// Trash actions.
    pub trash: TrashCoordinator,
    /// Telegram linking.
    pub telegram: TelegramLink,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("base_url", &self.config.api.base_url)
            .field("cache", &self.cache)
            .finish()
    }
}

impl AppContext {
    /// Wire every service around an existing accessor and token store.
    pub fn new(config: ClientConfig, api: Arc<dyn RemoteApi>, tokens: TokenStore) -> Self {
        let source = Arc::new(RemoteListingSource::new(Arc::clone(&api)));
        let cache = ListingCache::new(&config.cache, source);
        let notifications = NotificationCenter::new(&config.notifications);

        Self {
            auth: AuthStore::new(
                Arc::clone(&api),
                tokens.clone(),
                cache.clone(),
                notifications.clone(),
            ),
            files: FileCoordinator::new(Arc::clone(&api), cache.clone(), notifications.clone()),
            folders: FolderCoordinator::new(Arc::clone(&api), cache.clone(), notifications.clone()),
            uploads: UploadCoordinator::new(Arc::clone(&api), cache.clone(), notifications.clone()),
            trash: TrashCoordinator::new(Arc::clone(&api), cache.clone(), notifications.clone()),
            telegram: TelegramLink::new(Arc::clone(&api), notifications.clone()),
            config: Arc::new(config),
            api,
            tokens,
            cache,
            notifications,
        }
    }

    /// Open the persisted session and connect to the configured backend.
    pub async fn connect(config: ClientConfig) -> AppResult<Self> {
        let tokens = TokenStore::open(&config.session.token_file).await?;
        let api = HttpApiClient::new(&config.api, tokens.clone())?;
        info!(base_url = %config.api.base_url, "Client context ready");
        Ok(Self::new(config, Arc::new(api), tokens))
    }

    /// A dispatcher over this context's coordinators.
    pub fn dispatcher(&self) -> CommandDispatcher {
        CommandDispatcher::new(
            self.files.clone(),
            self.folders.clone(),
            self.uploads.clone(),
            self.trash.clone(),
        )
    }

    /// URL a preview loads `id` from.
    pub fn stream_url(&self, id: FileId) -> String {
        self.api.stream_url(id)
    }
}
