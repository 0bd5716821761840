//! Import run error taxonomy.
//!
//! Three kinds of failure abort an entire run: a feed page failure, a
//! category lookup/create failure, and a transaction commit failure. Image
//! failures are deliberately NOT here - they are product-local and surface
//! as [`crate::pipeline::ProductOutcome::Skipped`] instead.

use thiserror::Error;

use crate::content::ContentStoreError;
use crate::feed::FeedError;

/// A fatal error that aborts an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Fetching a feed page failed. Never downgraded to partial success.
    #[error("feed fetch failed: {0}")]
    Feed(#[from] FeedError),

    /// Category lookup or creation failed. Unlike image failures this
    /// aborts the run, matching the store's historical behavior.
    #[error("category resolution failed for slug '{slug}': {source}")]
    Category {
        slug: String,
        #[source]
        source: ContentStoreError,
    },

    /// Committing the staged transaction failed. The content store applies
    /// a transaction atomically, so nothing is assumed to have landed.
    #[error("transaction commit failed: {0}")]
    Commit(#[source] ContentStoreError),

    /// An HTTP client could not be constructed (e.g. invalid TLS config).
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
