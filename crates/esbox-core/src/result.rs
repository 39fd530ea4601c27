//! Convenience result type alias for ESBox.

use crate::error::AppError;

/// A specialized `Result` type for ESBox client operations.
pub type AppResult<T> = Result<T, AppError>;
