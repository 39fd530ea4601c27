//! Breadcrumb stack from the top level down to the current folder.

use std::fmt;

use serde::{Deserialize, Serialize};

use esbox_cache::CacheKey;
use esbox_core::types::FolderId;
use esbox_entity::Folder;

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavFolder {
    /// Folder ID.
    pub id: FolderId,
    /// Name shown in the breadcrumb.
    pub name: String,
}

impl NavFolder {
    /// Create a breadcrumb entry.
    pub fn new(id: FolderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&Folder> for NavFolder {
    fn from(folder: &Folder) -> Self {
        Self::new(folder.id, folder.name.clone())
    }
}

/// Ordered path of folders entered from the top level.
///
/// An empty path means the top-level listing is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavPath {
    folders: Vec<NavFolder>,
}

impl NavPath {
    /// An empty path (top level).
    pub fn new() -> Self {
        Self::default()
    }

    /// Descend into a child of the current folder.
    pub fn enter(&mut self, folder: NavFolder) {
        self.folders.push(folder);
    }

    /// Truncate the path after the first occurrence of `folder`.
    ///
    /// Does nothing when the folder is not on the path.
    pub fn jump_to(&mut self, folder: &NavFolder) {
        if let Some(index) = self.folders.iter().position(|f| f.id == folder.id) {
            self.folders.truncate(index + 1);
        }
    }

    /// Return to the top level.
    pub fn jump_to_root(&mut self) {
        self.folders.clear();
    }

    /// Go up one level; returns the folder left, if any.
    pub fn up(&mut self) -> Option<NavFolder> {
        self.folders.pop()
    }

    /// ID of the folder currently shown, `None` at the top level.
    pub fn current_folder_id(&self) -> Option<FolderId> {
        self.folders.last().map(|f| f.id)
    }

    /// The folder currently shown.
    pub fn current(&self) -> Option<&NavFolder> {
        self.folders.last()
    }

    /// Key of the listing for the current folder.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_parent(self.current_folder_id())
    }

    /// Path entries from the top level down.
    pub fn folders(&self) -> &[NavFolder] {
        &self.folders
    }

    /// Number of folders entered.
    pub fn depth(&self) -> usize {
        self.folders.len()
    }

    /// Whether the top level is shown.
    pub fn is_root(&self) -> bool {
        self.folders.is_empty()
    }

    /// Breadcrumb labels, starting with `Home`.
    pub fn breadcrumbs(&self) -> Vec<&str> {
        std::iter::once("Home")
            .chain(self.folders.iter().map(|f| f.name.as_str()))
            .collect()
    }
}

impl fmt::Display for NavPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.breadcrumbs().join(" / "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_of(ids: &[(i64, &str)]) -> NavPath {
        let mut path = NavPath::new();
        for (id, name) in ids {
            path.enter(NavFolder::new(FolderId(*id), *name));
        }
        path
    }

    #[test]
    fn test_enter_then_root() {
        let mut path = NavPath::new();
        path.enter(NavFolder::new(FolderId(5), "docs"));
        assert_eq!(path.current_folder_id(), Some(FolderId(5)));
        assert_eq!(path.cache_key(), CacheKey::Folder(FolderId(5)));

        path.jump_to_root();
        assert_eq!(path.current_folder_id(), None);
        assert_eq!(path.cache_key(), CacheKey::Root);
    }

    #[test]
    fn test_jump_to_truncates_inclusive() {
        let mut path = path_of(&[(1, "A"), (2, "B"), (3, "C")]);
        path.jump_to(&NavFolder::new(FolderId(2), "B"));
        let ids: Vec<_> = path.folders().iter().map(|f| f.id).collect();
        assert_eq!(ids, [FolderId(1), FolderId(2)]);
    }

    #[test]
    fn test_jump_to_absent_folder_keeps_path() {
        let mut path = path_of(&[(1, "A"), (2, "B")]);
        let before = path.clone();
        path.jump_to(&NavFolder::new(FolderId(9), "Z"));
        assert_eq!(path, before);
    }

    #[test]
    fn test_jump_to_first_occurrence() {
        let mut path = path_of(&[(1, "A"), (2, "B"), (1, "A"), (3, "C")]);
        path.jump_to(&NavFolder::new(FolderId(1), "A"));
        assert_eq!(path.depth(), 1);
    }

    #[test]
    fn test_breadcrumbs_and_up() {
        let mut path = path_of(&[(1, "A"), (2, "B")]);
        assert_eq!(path.to_string(), "Home / A / B");
        assert_eq!(path.up().map(|f| f.id), Some(FolderId(2)));
        assert_eq!(path.breadcrumbs(), ["Home", "A"]);
        path.up();
        assert!(path.is_root());
        assert!(path.up().is_none());
    }
}
