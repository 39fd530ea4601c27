//! # esbox-client
//!
//! Outbound access to the ESBox REST API. [`RemoteApi`] is the seam the rest
//! of the client programs against; [`HttpApiClient`] implements it over
//! reqwest, attaching the session bearer token to every request and
//! normalising every failure into a single message string.

pub mod api;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod session;

pub use api::{ByteStream, CreatedFolder, FileUpload, ListQuery, ProgressFn, RemoteApi};
pub use http::HttpApiClient;
pub use session::TokenStore;
