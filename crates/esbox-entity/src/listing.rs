//! The folder/file pair cached per navigation key.

use serde::{Deserialize, Serialize};

use esbox_core::types::{FileId, FolderId};

use crate::file::File;
use crate::folder::Folder;

/// Folders and files of one view, in backend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Folders in the view.
    #[serde(default)]
    pub folders: Vec<Folder>,
    /// Files in the view.
    #[serde(default)]
    pub files: Vec<File>,
}

impl Listing {
    /// Create a listing from its parts.
    pub fn new(folders: Vec<Folder>, files: Vec<File>) -> Self {
        Self { folders, files }
    }

    /// Whether the view has neither folders nor files.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    /// Look up a folder by ID.
    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Look up a file by ID.
    pub fn file(&self, id: FileId) -> Option<&File> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Look up a folder by exact name.
    pub fn folder_named(&self, name: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.name == name)
    }

    /// Look up a file by exact name.
    pub fn file_named(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.filename == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let listing: Listing = serde_json::from_str(r#"{"folders": []}"#).unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.len(), 0);
    }
}
