//! # esbox-entity
//!
//! Domain entity models for the ESBox client. Every struct in this crate is
//! either a snapshot of a backend resource (folders, files, users, trash
//! entries) or a request/response envelope exchanged with the REST API.
//! All entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod auth;
pub mod file;
pub mod folder;
pub mod listing;
pub mod message;
pub mod telegram;
pub mod trash;

pub use file::{File, FileAction, MediaKind};
pub use folder::{CreateFolder, Folder, FolderUpdate};
pub use listing::Listing;
pub use message::MessageResponse;
pub use trash::{ItemType, TrashItem};
