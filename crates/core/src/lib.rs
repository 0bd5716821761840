//! Kilnworks Core - Shared types library.
//!
//! This crate provides common types used across all Kilnworks components:
//! - `storefront` - Public-facing e-commerce site
//! - `importer` - Catalog import pipeline (feed -> content store)
//! - `cli` - Command-line tools for catalog management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Feed records and content-store document shapes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
