//! Pure listing transforms applied after a confirmed remote mutation.
//!
//! Every function here takes a listing by reference and returns a new one,
//! so the cache can swap the whole value atomically and the transforms can
//! be tested without a network layer.

use esbox_core::types::{FileId, FolderId};
use esbox_entity::{File, Folder, Listing};

use crate::keys::CacheKey;

/// One in-place change to a cached listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingPatch {
    /// Add a folder, replacing any entry with the same ID.
    InsertFolder(Folder),
    /// Add a file, replacing any entry with the same ID.
    InsertFile(File),
    /// Replace the folder with the same ID; no-op if absent.
    ReplaceFolder(Folder),
    /// Replace the file with the same ID; no-op if absent.
    ReplaceFile(File),
    /// Rename a folder.
    RenameFolder {
        /// Folder to rename.
        id: FolderId,
        /// New display name.
        name: String,
    },
    /// Rename a file.
    RenameFile {
        /// File to rename.
        id: FileId,
        /// New file name.
        filename: String,
    },
    /// Set a folder's starred flag.
    StarFolder {
        /// Folder to update.
        id: FolderId,
        /// New flag value.
        starred: bool,
    },
    /// Set a file's starred flag.
    StarFile {
        /// File to update.
        id: FileId,
        /// New flag value.
        starred: bool,
    },
    /// Drop a folder.
    RemoveFolder(FolderId),
    /// Drop a file.
    RemoveFile(FileId),
}

impl ListingPatch {
    /// Apply the patch, returning the new listing. Untouched entries keep
    /// their position.
    pub fn apply(&self, listing: &Listing) -> Listing {
        let mut next = listing.clone();
        match self {
            Self::InsertFolder(folder) => upsert(&mut next.folders, folder.clone(), |f| f.id),
            Self::InsertFile(file) => upsert(&mut next.files, file.clone(), |f| f.id),
            Self::ReplaceFolder(folder) => {
                replace_by(&mut next.folders, folder.id, |f| f.id, |f| *f = folder.clone())
            }
            Self::ReplaceFile(file) => {
                replace_by(&mut next.files, file.id, |f| f.id, |f| *f = file.clone())
            }
            Self::RenameFolder { id, name } => {
                replace_by(&mut next.folders, *id, |f| f.id, |f| f.name = name.clone())
            }
            Self::RenameFile { id, filename } => replace_by(
                &mut next.files,
                *id,
                |f| f.id,
                |f| f.filename = filename.clone(),
            ),
            Self::StarFolder { id, starred } => {
                replace_by(&mut next.folders, *id, |f| f.id, |f| f.is_starred = *starred)
            }
            Self::StarFile { id, starred } => {
                replace_by(&mut next.files, *id, |f| f.id, |f| f.is_starred = *starred)
            }
            Self::RemoveFolder(id) => next.folders.retain(|f| f.id != *id),
            Self::RemoveFile(id) => next.files.retain(|f| f.id != *id),
        }
        next
    }

    /// Apply the patch, then drop whatever the view no longer admits.
    ///
    /// This is where un-starring inside the starred view removes the entry.
    pub fn apply_in_view(&self, key: &CacheKey, listing: &Listing) -> Listing {
        let mut next = self.apply(listing);
        next.folders.retain(|f| key.admits_folder(f));
        next.files.retain(|f| key.admits_file(f));
        next
    }
}

fn upsert<T, I: PartialEq>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> I) {
    let target = id(&item);
    match items.iter().position(|existing| id(existing) == target) {
        Some(index) => items[index] = item,
        None => items.push(item),
    }
}

fn replace_by<T, I: PartialEq>(
    items: &mut [T],
    target: I,
    id: impl Fn(&T) -> I,
    update: impl FnOnce(&mut T),
) {
    if let Some(item) = items.iter_mut().find(|item| id(item) == target) {
        update(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: i64, name: &str, starred: bool) -> Folder {
        Folder {
            id: FolderId(id),
            name: name.to_string(),
            parent_id: None,
            is_starred: starred,
            is_root: false,
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn file(id: i64, name: &str, starred: bool) -> File {
        File {
            id: FileId(id),
            filename: name.to_string(),
            parent_id: Some(FolderId(42)),
            mime_type: Some("text/plain".to_string()),
            file_size: 10,
            is_starred: starred,
            uploaded_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_rename_file_leaves_folders_untouched() {
        let listing = Listing::new(vec![], vec![file(7, "old.txt", false)]);
        let next = ListingPatch::RenameFile {
            id: FileId(7),
            filename: "x".to_string(),
        }
        .apply(&listing);

        assert!(next.folders.is_empty());
        assert_eq!(next.files.len(), 1);
        assert_eq!(next.files[0].filename, "x");
        assert_eq!(next.files[0].file_size, 10);
        assert_eq!(listing.files[0].filename, "old.txt");
    }

    #[test]
    fn test_remove_keeps_order_of_others() {
        let listing = Listing::new(
            vec![folder(1, "a", false), folder(2, "b", false), folder(3, "c", false)],
            vec![],
        );
        let next = ListingPatch::RemoveFolder(FolderId(2)).apply(&listing);
        let names: Vec<_> = next.folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn test_patch_for_unknown_id_is_identity() {
        let listing = Listing::new(vec![folder(1, "a", false)], vec![file(7, "f", false)]);
        let next = ListingPatch::StarFile {
            id: FileId(99),
            starred: true,
        }
        .apply(&listing);
        assert_eq!(next, listing);
    }

    #[test]
    fn test_insert_replaces_existing_id() {
        let listing = Listing::new(vec![folder(1, "a", false)], vec![]);
        let next = ListingPatch::InsertFolder(folder(1, "renamed", false)).apply(&listing);
        assert_eq!(next.folders.len(), 1);
        assert_eq!(next.folders[0].name, "renamed");

        let next = ListingPatch::InsertFolder(folder(2, "b", false)).apply(&next);
        assert_eq!(next.folders.len(), 2);
    }

    #[test]
    fn test_unstar_in_starred_view_removes_entry() {
        let listing = Listing::new(vec![folder(1, "a", true)], vec![file(7, "f", true)]);
        let patch = ListingPatch::StarFile {
            id: FileId(7),
            starred: false,
        };

        let starred = patch.apply_in_view(&CacheKey::Starred, &listing);
        assert!(starred.files.is_empty());
        assert_eq!(starred.folders.len(), 1);

        let in_folder = patch.apply_in_view(&CacheKey::Folder(FolderId(42)), &listing);
        assert_eq!(in_folder.files.len(), 1);
        assert!(!in_folder.files[0].is_starred);
    }
}
