//! Single-slot dialog orchestration.

pub mod dialog;
pub mod state;

pub use dialog::{Modal, ModalKind};
pub use state::ModalState;
