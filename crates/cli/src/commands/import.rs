//! Catalog import command.
//!
//! Runs the import pipeline once: paginate the product feed, re-host each
//! product's image in the content store, resolve categories, and commit the
//! resulting upserts as a single transaction.
//!
//! # Environment Variables
//!
//! - `PRODUCT_FEED_URL` - Base URL of the paginated product feed
//! - `CONTENT_STORE_API_URL` - Content store API base URL
//! - `CONTENT_STORE_DATASET` - Dataset name
//! - `CONTENT_STORE_WRITE_TOKEN` - Write token for mutations and uploads
//! - `PRODUCT_FEED_PAGE_SIZE` - Records per page (default: 50)

use tracing::{info, warn};

use kilnworks_importer::{ImporterConfig, run_import};

/// Import the product catalog from the configured feed.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or the run hits a fatal
/// failure (feed fetch, category resolution, or commit). Products skipped
/// over image failures do not fail the run; they are listed in the summary.
pub async fn products() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = ImporterConfig::from_env()?;
    info!(feed = %config.feed_url, page_size = config.page_size, "Starting catalog import");

    let report = run_import(&config).await?;

    // Print summary
    info!("Import complete!");
    info!("  Products imported: {}", report.imported);
    info!("  Products skipped: {}", report.skipped.len());

    if !report.skipped.is_empty() {
        warn!("Skipped products (image failures):");
        for name in &report.skipped {
            warn!("  - {name}");
        }
    }

    Ok(())
}
