//! Short-lived toast notifications.

pub mod center;

pub use center::{NotificationCenter, Toast, ToastLevel};
