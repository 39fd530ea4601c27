//! # esbox-service
//!
//! Application layer of the ESBox client. Everything a front end needs to
//! drive a browsing session lives here: the [`AppContext`] that owns the
//! listing cache and remote accessor, the navigation stack, the modal
//! orchestrator, toast notifications, and the coordinators that turn a
//! confirmed remote mutation into a local cache patch.
//!
//! State is held in explicit objects passed by reference; nothing in this
//! crate is a process global.

pub mod auth;
pub mod context;
pub mod coordinator;
pub mod dispatch;
pub mod modal;
pub mod nav;
pub mod notification;
pub mod preview;
pub mod route;
pub mod source;
pub mod telegram;

pub use auth::AuthStore;
pub use context::AppContext;
pub use coordinator::{
    FileCoordinator, FolderCoordinator, MutationOutcome, MutationPhase, TrashCoordinator,
    UploadCoordinator,
};
pub use dispatch::{Command, CommandDispatcher, CommandOutcome, CommandRequest, CommandResponse};
pub use modal::{Modal, ModalKind, ModalState};
pub use nav::{NavFolder, NavPath};
pub use notification::{NotificationCenter, Toast, ToastLevel};
pub use route::Route;
pub use source::RemoteListingSource;
pub use telegram::TelegramLink;

#[cfg(test)]
mod testing;
