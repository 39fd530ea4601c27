//! Tagged command requests submitted by dialogs.
//!
//! A dialog never calls a coordinator directly: it builds a
//! [`CommandRequest`] naming the view it was opened from, and the
//! [`CommandDispatcher`] routes it and answers with a [`CommandResponse`]
//! carrying the same request ID.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use esbox_cache::CacheKey;
use esbox_core::error::ErrorKind;
use esbox_core::result::AppResult;
use esbox_core::types::FolderId;
use esbox_entity::{File, Folder, TrashItem};

use crate::coordinator::{
    FileCoordinator, FolderCoordinator, MutationOutcome, TrashCoordinator, UploadCoordinator,
};
use crate::modal::Modal;

/// A mutation requested by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Create a folder under `parent_id`.
    CreateFolder {
        parent_id: Option<FolderId>,
        name: String,
    },
    /// Rename a folder.
    RenameFolder {
        folder: Folder,
        name: String,
    },
    /// Move a folder to the trash.
    DeleteFolder {
        folder: Folder,
    },
    /// Star or unstar a folder.
    ToggleStarFolder {
        folder: Folder,
    },
    /// Rename a file.
    RenameFile {
        file: File,
        name: String,
    },
    /// Move a file to the trash.
    DeleteFile {
        file: File,
    },
    /// Star or unstar a file.
    ToggleStarFile {
        file: File,
    },
    /// Move a file into another folder (`None` is the top level).
    MoveFile {
        file: File,
        parent_id: Option<FolderId>,
    },
    /// Upload a local file, optionally under another name.
    UploadFile {
        path: PathBuf,
        parent_id: Option<FolderId>,
        name: Option<String>,
    },
    /// Restore a trashed item.
    Restore {
        item: TrashItem,
    },
    /// Delete a trashed item for good.
    Purge {
        item: TrashItem,
    },
}

impl Command {
    /// The command a dialog submits, given the text the user entered.
    ///
    /// Preview and Telegram dialogs submit nothing and return `None`.
    pub fn from_dialog(modal: &Modal, input: &str) -> Option<Self> {
        let input = input.to_string();
        match modal {
            Modal::NewFolder { parent_id } => Some(Self::CreateFolder {
                parent_id: *parent_id,
                name: input,
            }),
            Modal::RenameFolder { folder } => Some(Self::RenameFolder {
                folder: folder.clone(),
                name: input,
            }),
            Modal::DeleteFolder { folder } => Some(Self::DeleteFolder {
                folder: folder.clone(),
            }),
            Modal::DeleteFile { file } => Some(Self::DeleteFile { file: file.clone() }),
            Modal::RenameFile { file } => Some(Self::RenameFile {
                file: file.clone(),
                name: input,
            }),
            Modal::UploadFile { parent_id } => Some(Self::UploadFile {
                path: PathBuf::from(input.trim()),
                parent_id: *parent_id,
                name: None,
            }),
            Modal::TelegramLink
            | Modal::StreamImage { .. }
            | Modal::StreamPdf { .. }
            | Modal::StreamVideo { .. } => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::CreateFolder { .. } => "create_folder",
            Self::RenameFolder { .. } => "rename_folder",
            Self::DeleteFolder { .. } => "delete_folder",
            Self::ToggleStarFolder { .. } => "toggle_star_folder",
            Self::RenameFile { .. } => "rename_file",
            Self::DeleteFile { .. } => "delete_file",
            Self::ToggleStarFile { .. } => "toggle_star_file",
            Self::MoveFile { .. } => "move_file",
            Self::UploadFile { .. } => "upload_file",
            Self::Restore { .. } => "restore",
            Self::Purge { .. } => "purge",
        }
    }
}

/// A command together with the view it was issued from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Correlates the response.
    pub id: Uuid,
    /// Listing the user was looking at.
    pub view: CacheKey,
    /// What to do.
    pub command: Command,
}

impl CommandRequest {
    /// A new request with a fresh ID.
    pub fn new(view: CacheKey, command: Command) -> Self {
        Self {
            id: Uuid::new_v4(),
            view,
            command,
        }
    }
}

/// How a request ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The cache was patched; `message` is the success toast.
    Applied { message: String },
    /// Nothing to change (for example an unchanged name).
    NoOp,
    /// Rejected locally or by the backend.
    Failed { kind: ErrorKind, error: String },
}

/// Answer to a [`CommandRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// ID of the request answered.
    pub request_id: Uuid,
    /// Result.
    pub outcome: CommandOutcome,
}

impl CommandResponse {
    /// Whether the command changed anything.
    pub fn is_applied(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Applied { .. })
    }
}

/// Routes commands to the coordinator that owns them.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    files: FileCoordinator,
    folders: FolderCoordinator,
    uploads: UploadCoordinator,
    trash: TrashCoordinator,
}

impl CommandDispatcher {
    /// Creates a dispatcher over the given coordinators.
    pub fn new(
        files: FileCoordinator,
        folders: FolderCoordinator,
        uploads: UploadCoordinator,
        trash: TrashCoordinator,
    ) -> Self {
        Self {
            files,
            folders,
            uploads,
            trash,
        }
    }

    /// Run a request; failures are returned in the response, never as `Err`.
    #[instrument(skip_all, fields(request_id = %req.id, view = %req.view, command = req.command.name()))]
    pub async fn dispatch(&self, req: CommandRequest) -> CommandResponse {
        let outcome = match self.run(&req.view, &req.command).await {
            Ok(MutationOutcome::Applied { message }) => CommandOutcome::Applied { message },
            Ok(MutationOutcome::NoOp) => CommandOutcome::NoOp,
            Err(err) => CommandOutcome::Failed {
                kind: err.kind,
                error: err.message,
            },
        };
        debug!(?outcome, "Command finished");
        CommandResponse {
            request_id: req.id,
            outcome,
        }
    }

    async fn run(&self, view: &CacheKey, command: &Command) -> AppResult<MutationOutcome> {
        match command {
            Command::CreateFolder { parent_id, name } => {
                self.folders.create(*parent_id, name).await
            }
            Command::RenameFolder { folder, name } => {
                self.folders.rename(view, folder, name).await
            }
            Command::DeleteFolder { folder } => self.folders.delete(view, folder).await,
            Command::ToggleStarFolder { folder } => self.folders.toggle_star(view, folder).await,
            Command::RenameFile { file, name } => self.files.rename(view, file, name).await,
            Command::DeleteFile { file } => self.files.delete(view, file).await,
            Command::ToggleStarFile { file } => self.files.toggle_star(view, file).await,
            Command::MoveFile { file, parent_id } => {
                self.files.move_to(view, file, *parent_id).await
            }
            Command::UploadFile {
                path,
                parent_id,
                name,
            } => {
                self.uploads
                    .upload(path, *parent_id, name.as_deref())
                    .await
            }
            Command::Restore { item } => self.trash.restore(item).await,
            Command::Purge { item } => self.trash.purge(item).await,
        }
    }
}
