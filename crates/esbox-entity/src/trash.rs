//! Trash entries and the restore/purge envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

use esbox_core::types::{FileId, FolderId};

/// Kind of a trashed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// A trashed file.
    File,
    /// A trashed folder.
    Folder,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder => write!(f, "folder"),
        }
    }
}

/// Address of an item in the trash, used by restore and permanent delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrashItem {
    /// ID of the file or folder.
    pub item_id: i64,
    /// Whether `item_id` names a file or a folder.
    pub item_type: ItemType,
}

impl TrashItem {
    /// Trash address of a file.
    pub fn file(id: FileId) -> Self {
        Self {
            item_id: id.get(),
            item_type: ItemType::File,
        }
    }

    /// Trash address of a folder.
    pub fn folder(id: FolderId) -> Self {
        Self {
            item_id: id.get(),
            item_type: ItemType::Folder,
        }
    }
}
