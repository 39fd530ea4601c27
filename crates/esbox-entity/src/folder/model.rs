//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esbox_core::types::{FolderId, UserId};

/// A folder snapshot as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    #[serde(alias = "folder_id")]
    pub id: FolderId,
    /// Display name.
    #[serde(alias = "folder_name")]
    pub name: String,
    /// Parent folder ID (null for top-level folders).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Whether the user starred this folder.
    #[serde(default)]
    pub is_starred: bool,
    /// Whether this is the account's root folder.
    #[serde(default)]
    pub is_root: bool,
    /// Owning account.
    #[serde(default)]
    pub user_id: Option<UserId>,
    /// When the folder was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the folder was last updated.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Folder {
    /// Check if this folder sits at the top of the hierarchy.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Body of the create-folder call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for top level).
    pub parent_id: Option<FolderId>,
}

/// Partial update of a folder; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New parent folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FolderId>,
    /// New starred flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_starred: Option<bool>,
}

impl FolderUpdate {
    /// Update that only renames.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Update that only sets the starred flag.
    pub fn star(starred: bool) -> Self {
        Self {
            is_starred: Some(starred),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{
            "user_id": 3,
            "is_root": false,
            "name": "Photos",
            "created_at": "2025-03-01T10:00:00Z",
            "id": 12,
            "is_starred": true,
            "parent_id": null,
            "updated_at": null
        }"#;
        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.id, FolderId(12));
        assert!(folder.is_starred);
        assert!(folder.is_top_level());
        assert!(folder.updated_at.is_none());
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let body = serde_json::to_value(FolderUpdate::star(false)).unwrap();
        assert_eq!(body, serde_json::json!({ "is_starred": false }));
    }
}
