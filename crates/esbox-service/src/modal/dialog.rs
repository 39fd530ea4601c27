//! Dialog variants and their payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use esbox_core::types::FolderId;
use esbox_entity::{File, Folder, MediaKind};

/// A dialog together with the data only it can interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "camelCase")]
pub enum Modal {
    /// Create a folder under `parent_id`.
    NewFolder {
        /// Where the folder will be created.
        parent_id: Option<FolderId>,
    },
    /// Rename a folder.
    RenameFolder {
        /// Folder being renamed.
        folder: Folder,
    },
    /// Confirm moving a folder to trash.
    DeleteFolder {
        /// Folder being deleted.
        folder: Folder,
    },
    /// Confirm moving a file to trash.
    DeleteFile {
        /// File being deleted.
        file: File,
    },
    /// Rename a file.
    RenameFile {
        /// File being renamed.
        file: File,
    },
    /// Upload a local file into `parent_id`.
    UploadFile {
        /// Destination folder.
        parent_id: Option<FolderId>,
    },
    /// Link a Telegram account.
    TelegramLink,
    /// Image preview.
    StreamImage {
        /// File shown.
        file: File,
        /// Stream URL.
        url: String,
    },
    /// PDF preview.
    #[serde(rename = "streamPDF")]
    StreamPdf {
        /// File shown.
        file: File,
        /// Stream URL.
        url: String,
    },
    /// Video preview.
    StreamVideo {
        /// File shown.
        file: File,
        /// Stream URL.
        url: String,
    },
}

/// Dialog discriminant without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModalKind {
    NewFolder,
    RenameFolder,
    DeleteFolder,
    DeleteFile,
    RenameFile,
    UploadFile,
    TelegramLink,
    StreamImage,
    #[serde(rename = "streamPDF")]
    StreamPdf,
    StreamVideo,
}

impl Modal {
    /// The preview dialog for a file, if it has a previewable type.
    pub fn preview(file: File, url: String) -> Option<Self> {
        match file.media_kind()? {
            MediaKind::Image => Some(Self::StreamImage { file, url }),
            MediaKind::Pdf => Some(Self::StreamPdf { file, url }),
            MediaKind::Video => Some(Self::StreamVideo { file, url }),
        }
    }

    /// Which dialog this is.
    pub fn kind(&self) -> ModalKind {
        match self {
            Self::NewFolder { .. } => ModalKind::NewFolder,
            Self::RenameFolder { .. } => ModalKind::RenameFolder,
            Self::DeleteFolder { .. } => ModalKind::DeleteFolder,
            Self::DeleteFile { .. } => ModalKind::DeleteFile,
            Self::RenameFile { .. } => ModalKind::RenameFile,
            Self::UploadFile { .. } => ModalKind::UploadFile,
            Self::TelegramLink => ModalKind::TelegramLink,
            Self::StreamImage { .. } => ModalKind::StreamImage,
            Self::StreamPdf { .. } => ModalKind::StreamPdf,
            Self::StreamVideo { .. } => ModalKind::StreamVideo,
        }
    }

    /// Dialog heading.
    pub fn title(&self) -> String {
        match self {
            Self::NewFolder { .. } => "New folder".to_string(),
            Self::RenameFolder { folder } => format!("Rename \"{}\"", folder.name),
            Self::DeleteFolder { folder } => format!("Delete \"{}\"?", folder.name),
            Self::DeleteFile { file } => format!("Delete \"{}\"?", file.filename),
            Self::RenameFile { file } => format!("Rename \"{}\"", file.filename),
            Self::UploadFile { .. } => "Upload file".to_string(),
            Self::TelegramLink => "Link Telegram".to_string(),
            Self::StreamImage { file, .. }
            | Self::StreamPdf { file, .. }
            | Self::StreamVideo { file, .. } => file.filename.clone(),
        }
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NewFolder => "newFolder",
            Self::RenameFolder => "renameFolder",
            Self::DeleteFolder => "deleteFolder",
            Self::DeleteFile => "deleteFile",
            Self::RenameFile => "renameFile",
            Self::UploadFile => "uploadFile",
            Self::TelegramLink => "telegramLink",
            Self::StreamImage => "streamImage",
            Self::StreamPdf => "streamPDF",
            Self::StreamVideo => "streamVideo",
        };
        f.write_str(name)
    }
}
