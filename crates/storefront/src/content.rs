//! Read-side client for the content store.
//!
//! The storefront only ever queries the catalog the importer populated; it
//! holds no write token. Product list and detail queries are cached with
//! `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use kilnworks_core::ProductDocument;

use crate::config::ContentReadConfig;

/// Errors that can occur when querying the content store.
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-success status.
    #[error("content store returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Cache key for catalog queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Products,
    Product(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Products(Vec<ProductDocument>),
    Product(Box<ProductDocument>),
}

/// Client for the content store's query API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct ContentClient {
    inner: Arc<ContentClientInner>,
}

struct ContentClientInner {
    client: reqwest::Client,
    api_url: String,
    dataset: String,
    cache: Cache<CacheKey, CacheValue>,
}

#[derive(Debug, serde::Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

impl ContentClient {
    /// Create a read client for the configured content store.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &ContentReadConfig) -> Result<Self, reqwest::Error> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            inner: Arc::new(ContentClientInner {
                client,
                api_url: config.api_url.trim_end_matches('/').to_string(),
                dataset: config.dataset.clone(),
                cache,
            }),
        })
    }

    /// Run a query against the store.
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &serde_json::Value)],
    ) -> Result<Option<T>, ContentError> {
        let url = format!("{}/data/query/{}", self.inner.api_url, self.inner.dataset);
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${name}"), value.to_string()));
        }

        let response = self.inner.client.get(&url).query(&pairs).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Content store returned non-success status"
            );
            return Err(ContentError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: QueryResponse<T> = serde_json::from_str(&body)?;
        Ok(parsed.result)
    }

    /// List every product in the catalog, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductDocument>, ContentError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<ProductDocument> = self
            .query(r#"*[_type == "product"] | order(name asc)"#, &[])
            .await?
            .unwrap_or_default();

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its document id.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::NotFound`] if no such product exists, or
    /// another variant if the query fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_product(&self, id: &str) -> Result<ProductDocument, ContentError> {
        let cache_key = CacheKey::Product(id.to_string());
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let id_param = serde_json::Value::String(id.to_string());
        let product: ProductDocument = self
            .query(
                r#"*[_type == "product" && _id == $id][0]"#,
                &[("id", &id_param)],
            )
            .await?
            .ok_or_else(|| ContentError::NotFound(format!("Product not found: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Cheap connectivity probe for the readiness endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or rejects the query.
    pub async fn ping(&self) -> Result<(), ContentError> {
        self.query::<serde_json::Value>(r#"count(*[_type == "product"])"#, &[])
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_error_display() {
        let err = ContentError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = ContentError::UnexpectedStatus {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }
}
