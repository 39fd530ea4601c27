//! Cache keys for every listing the client shows.
//!
//! Centralising key construction keeps the string forms in one place and
//! gives each view a single predicate describing which entries it admits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use esbox_core::error::AppError;
use esbox_core::types::FolderId;
use esbox_entity::{File, Folder};

const ROOT: &str = "files-and-folders";
const FOLDER_PREFIX: &str = "sub_folder_";
const STARRED: &str = "starred";
const TRASH: &str = "user_trash";

/// Identifies one listing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CacheKey {
    /// The top-level listing.
    Root,
    /// The contents of one folder.
    Folder(FolderId),
    /// Every starred folder and file (virtual view).
    Starred,
    /// Trashed folders and files (virtual view).
    Trash,
}

impl CacheKey {
    /// Key of the listing that contains an entity with this parent.
    pub fn for_parent(parent_id: Option<FolderId>) -> Self {
        match parent_id {
            Some(id) => Self::Folder(id),
            None => Self::Root,
        }
    }

    /// Key to patch for an entity shown in the `active` view.
    ///
    /// Virtual views are patched directly; otherwise the entity lives in
    /// its parent's listing.
    pub fn for_entity(active: &CacheKey, parent_id: Option<FolderId>) -> Self {
        if active.is_virtual() {
            *active
        } else {
            Self::for_parent(parent_id)
        }
    }

    /// Whether the listing is derived rather than a real folder's contents.
    pub fn is_virtual(&self) -> bool {
        matches!(self, Self::Starred | Self::Trash)
    }

    /// The folder whose contents this key lists, if any.
    pub fn folder_id(&self) -> Option<FolderId> {
        match self {
            Self::Folder(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether a folder belongs in this view.
    pub fn admits_folder(&self, folder: &Folder) -> bool {
        match self {
            Self::Starred => folder.is_starred,
            Self::Root | Self::Folder(_) | Self::Trash => true,
        }
    }

    /// Whether a file belongs in this view.
    pub fn admits_file(&self, file: &File) -> bool {
        match self {
            Self::Starred => file.is_starred,
            Self::Root | Self::Folder(_) | Self::Trash => true,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "{ROOT}"),
            Self::Folder(id) => write!(f, "{FOLDER_PREFIX}{id}"),
            Self::Starred => write!(f, "{STARRED}"),
            Self::Trash => write!(f, "{TRASH}"),
        }
    }
}

impl FromStr for CacheKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROOT => Ok(Self::Root),
            STARRED => Ok(Self::Starred),
            TRASH => Ok(Self::Trash),
            other => other
                .strip_prefix(FOLDER_PREFIX)
                .and_then(|id| id.parse::<FolderId>().ok())
                .map(Self::Folder)
                .ok_or_else(|| AppError::validation(format!("Unknown cache key '{other}'"))),
        }
    }
}

impl TryFrom<String> for CacheKey {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.to_string()
    }
}
