//! # esbox-core
//!
//! Core crate for the ESBox client. Contains configuration schemas,
//! typed identifiers, logging initialisation, and the unified error
//! system shared by every other crate in the workspace.
//!
//! This crate has **no** internal dependencies on other ESBox crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
