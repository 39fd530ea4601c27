//! Folder navigation state.

pub mod stack;

pub use stack::{NavFolder, NavPath};
