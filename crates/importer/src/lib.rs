//! Kilnworks catalog import pipeline.
//!
//! A batch job that paginates through an external product feed, re-hosts
//! each record's image in the content store (fetch, resize to a 1000px
//! width cap, upload), resolves or creates its category document, and
//! commits every successfully processed record as a single atomic
//! transaction of create-or-replace operations keyed by the feed's original
//! ids - so re-running the import replaces documents instead of duplicating
//! them.
//!
//! # Failure policy
//!
//! - Feed page failures, category resolution failures, and commit failures
//!   abort the whole run.
//! - Image fetch/resize/upload failures skip only the affected product; it
//!   is logged by name and absent from the committed batch, and the run
//!   still reports success.
//!
//! Products are processed strictly sequentially; there is no fan-out.
//!
//! # Example
//!
//! ```rust,ignore
//! use kilnworks_importer::{ImporterConfig, run_import};
//!
//! let config = ImporterConfig::from_env()?;
//! let report = run_import(&config).await?;
//! tracing::info!(imported = report.imported, skipped = report.skipped.len(), "done");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod category;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod image;
pub mod pipeline;

use std::time::Duration;

use tracing::{info, instrument, warn};

pub use config::{ConfigError, ContentStoreConfig, ImporterConfig};
pub use content::{CommitSummary, ContentClient, ContentStoreError, Transaction};
pub use error::ImportError;
pub use feed::{FeedClient, FeedError};
pub use image::ImageError;

/// Outcome of processing a single feed record.
#[derive(Debug)]
pub enum ProductOutcome {
    /// The product was fully processed and is ready to stage.
    Staged(kilnworks_core::ProductDocument),
    /// The product's image could not be re-hosted; the product is dropped
    /// from the batch and the run continues.
    Skipped {
        name: String,
        reason: ImageError,
    },
}

/// Report of a completed import run.
///
/// A run with skipped products still counts as a success; the skipped names
/// are surfaced here (and logged as warnings during the run) for the
/// operator.
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// Number of product documents committed.
    pub imported: usize,
    /// Names of products dropped due to image failures, in feed order.
    pub skipped: Vec<String>,
}

/// Run the full import: fetch the feed, process every product in feed
/// order, commit the staged batch atomically.
///
/// # Errors
///
/// Returns [`ImportError`] on any fatal failure (feed fetch, category
/// resolution, commit, or client construction). Image failures never
/// surface here; they appear in [`ImportReport::skipped`].
#[instrument(skip(config), fields(feed = %config.feed_url))]
pub async fn run_import(config: &ImporterConfig) -> Result<ImportReport, ImportError> {
    let feed = FeedClient::new(&config.feed_url, config.page_size, config.request_timeout_secs)?;
    let content = ContentClient::new(&config.content_store, config.request_timeout_secs)
        .map_err(ImportError::Client)?;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(ImportError::Client)?;

    let products = feed.fetch_all().await?;
    info!(count = products.len(), "Fetched product feed");

    let mut transaction = Transaction::new();
    let mut skipped = Vec::new();

    for product in &products {
        match pipeline::process_product(&http, &content, product).await? {
            ProductOutcome::Staged(document) => {
                info!(product = %document.name, "Prepared import for product");
                transaction.create_or_replace(document);
            }
            ProductOutcome::Skipped { name, reason } => {
                warn!(product = %name, error = %reason, "Skipping product due to image failure");
                skipped.push(name);
            }
        }
    }

    let imported = transaction.len();
    if transaction.is_empty() {
        // Nothing staged (empty feed or everything skipped): the store
        // rejects empty mutation arrays, and there is nothing to apply.
        info!("No products staged, skipping commit");
    } else {
        let summary = content.commit(transaction).await.map_err(ImportError::Commit)?;
        info!(
            transaction_id = %summary.transaction_id,
            committed = summary.committed,
            "Committed import transaction"
        );
    }

    info!(imported, skipped = skipped.len(), "Import complete");
    Ok(ImportReport { imported, skipped })
}
