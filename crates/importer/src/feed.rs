//! HTTP client for the paginated product feed.
//!
//! The feed serves JSON arrays of product records at
//! `GET <base>?offset=<n>&limit=<n>`. Pages are fetched at increasing
//! offsets starting from 0; a page with fewer records than the requested
//! limit (an empty page included) marks the end of the feed.
//!
//! Any page failure - non-success status, network error, malformed body -
//! is fatal to the whole fetch. Partial feeds are never returned.

use std::time::Duration;

use kilnworks_core::FeedProduct;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from the feed client. All of them abort an import run.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or TLS failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed returned a non-success status for a page.
    #[error("feed returned status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The page body was not a valid JSON array of product records.
    #[error("failed to deserialize feed page at offset {offset}: {source}")]
    Deserialize {
        offset: u64,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for the external product feed.
pub struct FeedClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl FeedClient {
    /// Create a feed client with the configured page size and per-request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(base_url: &str, page_size: u32, timeout_secs: u64) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            page_size,
        })
    }

    /// Fetch one page of product records at the given offset.
    ///
    /// # Errors
    ///
    /// - [`FeedError::UnexpectedStatus`] - any non-2xx status.
    /// - [`FeedError::Http`] - network failure.
    /// - [`FeedError::Deserialize`] - body is not a JSON array of records.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, offset: u64) -> Result<Vec<FeedProduct>, FeedError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("offset", offset.to_string()),
                ("limit", self.page_size.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| FeedError::Deserialize { offset, source })
    }

    /// Fetch the entire feed by walking pages at increasing offsets.
    ///
    /// Result order equals feed order across concatenated pages. Terminates
    /// on the first page shorter than the configured page size.
    ///
    /// # Errors
    ///
    /// Propagates the first page error; no partial result is returned.
    #[instrument(skip(self), fields(page_size = self.page_size))]
    pub async fn fetch_all(&self) -> Result<Vec<FeedProduct>, FeedError> {
        let mut products = Vec::new();
        let mut offset = 0u64;

        loop {
            let page = self.fetch_page(offset).await?;
            let fetched = page.len();
            debug!(offset, fetched, "Fetched feed page");
            products.extend(page);

            if fetched < self.page_size as usize {
                break;
            }
            offset += u64::from(self.page_size);
        }

        Ok(products)
    }
}
