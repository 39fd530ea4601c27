//! File domain entities.

pub mod action;
pub mod model;

pub use action::FileAction;
pub use model::{File, MediaKind};
