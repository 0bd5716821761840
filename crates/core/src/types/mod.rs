//! Shared catalog types.
//!
//! Two families of types live here:
//!
//! - [`feed`] - records as they arrive from the external product feed
//! - [`document`] - documents as they are stored in (and read back from)
//!   the content store

pub mod document;
pub mod feed;

pub use document::{CategoryDocument, ImageField, ProductDocument, Reference, Slug};
pub use feed::{CategorySpec, Dimensions, FeedProduct};
