//! # esbox-cache
//!
//! Client-side listing cache for ESBox. A listing (the folders and files of
//! one view) is cached per [`CacheKey`]; coordinators patch cached listings
//! in place after a confirmed remote mutation instead of refetching.
//!
//! - [`keys`]: cache keys and the declarative view predicates
//! - [`transform`]: pure `(Listing, ListingPatch) -> Listing` functions
//! - [`store`]: the [`ListingCache`] itself, backed by
//!   [moka](https://crates.io/crates/moka)

pub mod keys;
pub mod store;
pub mod transform;

pub use keys::CacheKey;
pub use store::{ListingCache, ListingSource};
pub use transform::ListingPatch;
