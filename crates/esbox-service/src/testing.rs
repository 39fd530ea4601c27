//! In-memory remote accessor for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use esbox_cache::CacheKey;
use esbox_client::{ByteStream, CreatedFolder, FileUpload, ListQuery, RemoteApi, TokenStore};
use esbox_core::config::ClientConfig;
use esbox_core::error::AppError;
use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId, UserId};
use esbox_entity::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    User, VerifyEmailRequest,
};
use esbox_entity::telegram::{TelegramAuthResponse, TelegramCodeRequest, TelegramVerifyRequest};
use esbox_entity::{
    CreateFolder, File, FileAction, Folder, FolderUpdate, Listing, MessageResponse, TrashItem,
};

use crate::context::AppContext;

/// Records every call; listings are served from a map keyed like the cache.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    listings: Mutex<HashMap<CacheKey, Listing>>,
    calls: Mutex<Vec<String>>,
    fail_next: Mutex<Option<AppError>>,
    next_id: AtomicI64,
}

impl FakeApi {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicI64::new(100),
            ..Self::default()
        })
    }

    pub(crate) fn put_listing(&self, key: CacheKey, listing: Listing) {
        self.listings.lock().unwrap().insert(key, listing);
    }

    /// Make the next call fail with `err`.
    pub(crate) fn fail_next(&self, err: AppError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) -> AppResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn listing(&self, key: CacheKey) -> Listing {
        self.listings
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RemoteApi for FakeApi {
    async fn register(&self, _req: &RegisterRequest) -> AppResult<MessageResponse> {
        self.record("register".to_string())?;
        Ok(MessageResponse::default())
    }

    async fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        self.record("login".to_string())?;
        if req.password != "secret" {
            return Err(AppError::authentication("Invalid credentials"));
        }
        Ok(LoginResponse {
            message: String::new(),
            token: "fake-token".to_string(),
        })
    }

    async fn logout(&self) -> AppResult<MessageResponse> {
        self.record("logout".to_string())?;
        Ok(MessageResponse::default())
    }

    async fn current_user(&self) -> AppResult<User> {
        self.record("current_user".to_string())?;
        Ok(User {
            id: UserId(1),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        })
    }

    async fn forgot_password(&self, _req: &ForgotPasswordRequest) -> AppResult<MessageResponse> {
        self.record("forgot_password".to_string())?;
        Ok(MessageResponse::default())
    }

    async fn reset_password(&self, _req: &ResetPasswordRequest) -> AppResult<MessageResponse> {
        self.record("reset_password".to_string())?;
        Ok(MessageResponse::default())
    }

    async fn verify_email(&self, _req: &VerifyEmailRequest) -> AppResult<MessageResponse> {
        self.record("verify_email".to_string())?;
        Ok(MessageResponse::default())
    }

    async fn list(&self, query: ListQuery) -> AppResult<Listing> {
        let key = match query {
            ListQuery::Children(parent) => CacheKey::for_parent(parent),
            ListQuery::Starred => CacheKey::Starred,
        };
        self.record(format!("list:{key}"))?;
        Ok(self.listing(key))
    }

    async fn list_trash(&self) -> AppResult<Listing> {
        self.record("list_trash".to_string())?;
        Ok(self.listing(CacheKey::Trash))
    }

    async fn create_folder(&self, req: &CreateFolder) -> AppResult<CreatedFolder> {
        self.record(format!("create_folder:{}", req.name))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(CreatedFolder {
            message: String::new(),
            folder: Some(Folder {
                parent_id: req.parent_id,
                ..folder(id, &req.name, 0, false)
            }),
        })
    }

    async fn update_folder(
        &self,
        id: FolderId,
        _update: &FolderUpdate,
    ) -> AppResult<MessageResponse> {
        self.record(format!("update_folder:{id}"))?;
        Ok(MessageResponse::default())
    }

    async fn delete_folder(&self, id: FolderId) -> AppResult<MessageResponse> {
        self.record(format!("delete_folder:{id}"))?;
        Ok(MessageResponse::default())
    }

    async fn upload_file(&self, upload: FileUpload) -> AppResult<MessageResponse> {
        let parent = upload
            .parent_id
            .map(|p| p.to_string())
            .unwrap_or_else(|| "none".to_string());
        self.record(format!(
            "upload_file:{}:{}:{}",
            upload.name, upload.mime_type, parent
        ))?;
        if let Some(progress) = &upload.progress {
            progress(upload.size / 2, upload.size);
            progress(upload.size, upload.size);
        }
        Ok(MessageResponse::default())
    }

    async fn update_file(&self, id: FileId, action: &FileAction) -> AppResult<MessageResponse> {
        let name = match action {
            FileAction::Rename { .. } => "rename",
            FileAction::Star => "star",
            FileAction::Unstar => "unstar",
            FileAction::Move { .. } => "move",
            FileAction::Delete => "delete",
        };
        self.record(format!("update_file:{id}:{name}"))?;
        Ok(MessageResponse::default())
    }

    async fn stream_file(&self, id: FileId) -> AppResult<ByteStream> {
        self.record(format!("stream_file:{id}"))?;
        let chunks = vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ];
        Ok(Box::pin(futures::stream::iter(chunks)))
    }

    fn stream_url(&self, id: FileId) -> String {
        format!("http://fake/api/v1/files/{id}/view")
    }

    async fn restore_trash(&self, item: &TrashItem) -> AppResult<MessageResponse> {
        self.record(format!("restore_trash:{}:{}", item.item_type, item.item_id))?;
        Ok(MessageResponse::default())
    }

    async fn purge_trash(&self, item: &TrashItem) -> AppResult<MessageResponse> {
        self.record(format!("purge_trash:{}:{}", item.item_type, item.item_id))?;
        Ok(MessageResponse::default())
    }

    async fn telegram_send_code(
        &self,
        req: &TelegramCodeRequest,
    ) -> AppResult<TelegramAuthResponse> {
        self.record(format!("telegram_send_code:{}", req.phone))?;
        Ok(TelegramAuthResponse {
            success: true,
            ..TelegramAuthResponse::default()
        })
    }

    async fn telegram_verify(
        &self,
        req: &TelegramVerifyRequest,
    ) -> AppResult<TelegramAuthResponse> {
        self.record(format!("telegram_verify:{}", req.code))?;
        Ok(TelegramAuthResponse {
            success: true,
            message: "Telegram linked".to_string(),
            ..TelegramAuthResponse::default()
        })
    }
}

/// A context over `api` with default configuration and an in-memory session.
pub(crate) fn harness(api: &Arc<FakeApi>) -> AppContext {
    let api: Arc<dyn RemoteApi> = Arc::clone(api) as Arc<dyn RemoteApi>;
    AppContext::new(ClientConfig::default(), api, TokenStore::in_memory())
}

/// A folder; `parent` 0 means top level.
pub(crate) fn folder(id: i64, name: &str, parent: i64, starred: bool) -> Folder {
    Folder {
        id: FolderId(id),
        name: name.to_string(),
        parent_id: (parent != 0).then_some(FolderId(parent)),
        is_starred: starred,
        is_root: false,
        user_id: None,
        created_at: None,
        updated_at: None,
    }
}

/// A file; `parent` 0 means top level.
pub(crate) fn file(id: i64, name: &str, parent: i64, starred: bool) -> File {
    File {
        id: FileId(id),
        filename: name.to_string(),
        parent_id: (parent != 0).then_some(FolderId(parent)),
        mime_type: None,
        file_size: 10,
        is_starred: starred,
        uploaded_at: None,
        updated_at: None,
    }
}
