//! Endpoint paths, relative to `{base_url}{api_prefix}`.

use esbox_core::types::{FileId, FolderId};

pub const REGISTER: &str = "auth/register";
pub const LOGIN: &str = "auth/login";
pub const LOGOUT: &str = "auth/logout";
pub const ME: &str = "auth/me";
pub const FORGOT_PASSWORD: &str = "auth/forgot-password";
pub const RESET_PASSWORD: &str = "auth/reset-password";
pub const VERIFY_EMAIL: &str = "auth/verify-email";

pub const FILES_AND_FOLDERS: &str = "folders/getAll";
pub const CREATE_FOLDER: &str = "folders/create";

pub const UPLOAD_FILE: &str = "files/upload";

pub const TRASH: &str = "trash";

pub const TELEGRAM_SEND_CODE: &str = "telegram/login";
pub const TELEGRAM_VERIFY: &str = "telegram/verify";

/// `folders/{id}` (update and delete).
pub fn folder(id: FolderId) -> String {
    format!("folders/{id}")
}

/// `files/{id}` (action envelope).
pub fn file(id: FileId) -> String {
    format!("files/{id}")
}

/// `files/{id}/view` (binary stream).
pub fn file_view(id: FileId) -> String {
    format!("files/{id}/view")
}
