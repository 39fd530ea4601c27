//! Session and account state.

pub mod store;

pub use store::AuthStore;
