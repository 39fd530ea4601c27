//! Client routes and the listing each one shows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use esbox_cache::CacheKey;
use esbox_core::error::AppError;
use esbox_core::types::FolderId;

use crate::nav::NavPath;

/// A browsable page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// The storage page; the folder shown comes from the navigation stack.
    Home,
    /// A folder opened directly by ID.
    Folder(FolderId),
    /// Starred entries.
    Starred,
    /// Trashed entries.
    Trash,
}

impl Route {
    /// Key of the listing shown on this route.
    pub fn cache_key(&self, nav: &NavPath) -> CacheKey {
        match self {
            Self::Home => nav.cache_key(),
            Self::Folder(id) => CacheKey::Folder(*id),
            Self::Starred => CacheKey::Starred,
            Self::Trash => CacheKey::Trash,
        }
    }

    /// Whether folders can be entered and files uploaded here.
    pub fn is_browsable(&self) -> bool {
        matches!(self, Self::Home | Self::Folder(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "/storage"),
            Self::Folder(id) => write!(f, "/storage/{id}"),
            Self::Starred => write!(f, "/starred"),
            Self::Trash => write!(f, "/trash"),
        }
    }
}

impl FromStr for Route {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        match trimmed {
            "" | "/storage" | "storage" => Ok(Self::Home),
            "/starred" | "starred" => Ok(Self::Starred),
            "/trash" | "trash" => Ok(Self::Trash),
            other => other
                .trim_start_matches('/')
                .strip_prefix("storage/")
                .and_then(|id| id.parse::<FolderId>().ok())
                .map(Self::Folder)
                .ok_or_else(|| AppError::not_found(format!("No page at '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavFolder;

    #[test]
    fn test_home_follows_navigation() {
        let mut nav = NavPath::new();
        assert_eq!(Route::Home.cache_key(&nav), CacheKey::Root);
        nav.enter(NavFolder::new(FolderId(8), "music"));
        assert_eq!(Route::Home.cache_key(&nav), CacheKey::Folder(FolderId(8)));
        assert_eq!(Route::Trash.cache_key(&nav), CacheKey::Trash);
    }

    #[test]
    fn test_parse_paths() {
        assert_eq!("/".parse::<Route>().unwrap(), Route::Home);
        assert_eq!("/storage/12".parse::<Route>().unwrap(), Route::Folder(FolderId(12)));
        assert_eq!("starred".parse::<Route>().unwrap(), Route::Starred);
        assert!("/settings".parse::<Route>().is_err());
        assert_eq!(Route::Folder(FolderId(3)).to_string(), "/storage/3");
    }
}
