//! The remote accessor trait every higher layer programs against.

use std::fmt;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use esbox_core::result::AppResult;
use esbox_core::types::{FileId, FolderId};
use esbox_entity::auth::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
    User, VerifyEmailRequest,
};
use esbox_entity::telegram::{TelegramAuthResponse, TelegramCodeRequest, TelegramVerifyRequest};
use esbox_entity::{
    CreateFolder, FileAction, Folder, FolderUpdate, Listing, MessageResponse, TrashItem,
};

/// A byte stream type used for streamed file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = AppResult<Bytes>> + Send>>;

/// Upload progress callback: `(bytes_sent, total_bytes)`.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Which listing to ask the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListQuery {
    /// Children of a folder (None for the top level).
    Children(Option<FolderId>),
    /// Every starred entry.
    Starred,
}

/// A local file to upload.
#[derive(Clone)]
pub struct FileUpload {
    /// Path of the source file on disk.
    pub path: PathBuf,
    /// Name to store the file under.
    pub name: String,
    /// Destination folder (None for the top level).
    pub parent_id: Option<FolderId>,
    /// MIME type sent with the file part.
    pub mime_type: String,
    /// Size of the source file in bytes.
    pub size: u64,
    /// Optional progress reporter.
    pub progress: Option<ProgressFn>,
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("parent_id", &self.parent_id)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size)
            .finish()
    }
}

/// Result of the create-folder call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatedFolder {
    /// Backend message, possibly empty.
    pub message: String,
    /// The created folder, when the backend returned it.
    pub folder: Option<Folder>,
}

/// Every backend operation the client uses.
///
/// Implementations must not retry; errors surface exactly once.
#[async_trait]
pub trait RemoteApi: fmt::Debug + Send + Sync + 'static {
    /// Create an account.
    async fn register(&self, req: &RegisterRequest) -> AppResult<MessageResponse>;

    /// Sign in and receive a bearer token.
    async fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse>;

    /// End the session on the backend.
    async fn logout(&self) -> AppResult<MessageResponse>;

    /// The signed-in account.
    async fn current_user(&self) -> AppResult<User>;

    /// Request a password reset link.
    async fn forgot_password(&self, req: &ForgotPasswordRequest) -> AppResult<MessageResponse>;

    /// Set a new password using a reset token.
    async fn reset_password(&self, req: &ResetPasswordRequest) -> AppResult<MessageResponse>;

    /// Confirm an email address.
    async fn verify_email(&self, req: &VerifyEmailRequest) -> AppResult<MessageResponse>;

    /// Fetch a folder or starred listing.
    async fn list(&self, query: ListQuery) -> AppResult<Listing>;

    /// Fetch the trash listing.
    async fn list_trash(&self) -> AppResult<Listing>;

    /// Create a folder.
    async fn create_folder(&self, req: &CreateFolder) -> AppResult<CreatedFolder>;

    /// Rename, move, or star a folder.
    async fn update_folder(&self, id: FolderId, update: &FolderUpdate)
    -> AppResult<MessageResponse>;

    /// Move a folder to the trash.
    async fn delete_folder(&self, id: FolderId) -> AppResult<MessageResponse>;

    /// Upload a file as multipart form data.
    async fn upload_file(&self, upload: FileUpload) -> AppResult<MessageResponse>;

    /// Apply an action (rename, star, unstar, move, delete) to a file.
    async fn update_file(&self, id: FileId, action: &FileAction) -> AppResult<MessageResponse>;

    /// Stream a file's contents.
    async fn stream_file(&self, id: FileId) -> AppResult<ByteStream>;

    /// Absolute URL a viewer loads a file from.
    fn stream_url(&self, id: FileId) -> String;

    /// Restore a trashed item.
    async fn restore_trash(&self, item: &TrashItem) -> AppResult<MessageResponse>;

    /// Permanently delete a trashed item.
    async fn purge_trash(&self, item: &TrashItem) -> AppResult<MessageResponse>;

    /// Send a Telegram login code to a phone number.
    async fn telegram_send_code(&self, req: &TelegramCodeRequest)
    -> AppResult<TelegramAuthResponse>;

    /// Verify the Telegram login code.
    async fn telegram_verify(&self, req: &TelegramVerifyRequest)
    -> AppResult<TelegramAuthResponse>;
}
