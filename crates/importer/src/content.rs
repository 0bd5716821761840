//! Write-side client for the content store.
//!
//! The content store is a schema-validated document database with a plain
//! JSON-over-HTTP API:
//!
//! - `GET  {api}/data/query/{dataset}?query=...&$param=...` - run a query
//! - `POST {api}/data/mutate/{dataset}` - apply a batch of mutations; one
//!   request is one atomic transaction (all mutations apply or none do)
//! - `POST {api}/assets/images/{dataset}?filename=...` - upload image bytes
//!
//! All requests carry the write token as a bearer header.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};

use kilnworks_core::ProductDocument;

use crate::config::ContentStoreConfig;

/// Errors from the content store API.
#[derive(Debug, Error)]
pub enum ContentStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned a non-success status.
    #[error("content store returned status {status} during {operation}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response was well-formed JSON but missing an expected field.
    #[error("unexpected response during {operation}: {detail}")]
    UnexpectedResponse {
        operation: &'static str,
        detail: String,
    },
}

/// A staged mutation. Serializes to the store's wire shape, e.g.
/// `{"createOrReplace": {...}}`.
#[derive(Debug, Serialize)]
enum Mutation {
    #[serde(rename = "createOrReplace")]
    CreateOrReplace(ProductDocument),
}

/// An ordered batch of upsert operations, committed atomically.
///
/// Staging is infallible; serialization happens at commit time inside the
/// mutate request.
#[derive(Debug, Default)]
pub struct Transaction {
    mutations: Vec<Mutation>,
}

impl Transaction {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a create-or-replace operation keyed by the document's `_id`.
    pub fn create_or_replace(&mut self, document: ProductDocument) {
        self.mutations.push(Mutation::CreateOrReplace(document));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Summary of a committed transaction.
#[derive(Debug, Clone)]
pub struct CommitSummary {
    /// Transaction id assigned by the content store.
    pub transaction_id: String,
    /// Number of upserts applied.
    pub committed: usize,
}

/// Client for the content store's write API.
pub struct ContentClient {
    client: reqwest::Client,
    api_url: String,
    dataset: String,
    token: SecretString,
}

#[derive(Debug, serde::Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

#[derive(Debug, serde::Deserialize)]
struct MutateResponse {
    #[serde(rename = "transactionId")]
    transaction_id: String,
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, serde::Deserialize)]
struct MutateResult {
    id: String,
}

#[derive(Debug, serde::Deserialize)]
struct AssetResponse {
    document: AssetDocument,
}

#[derive(Debug, serde::Deserialize)]
struct AssetDocument {
    #[serde(rename = "_id")]
    id: String,
}

impl ContentClient {
    /// Create a write client for the configured content store.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(config: &ContentStoreConfig, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            dataset: config.dataset.clone(),
            token: config.write_token.clone(),
        })
    }

    /// Run a query returning the first matching document, if any.
    ///
    /// Parameters are passed as `$name` query arguments, JSON-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error on non-success status or an unparseable body.
    #[instrument(skip(self, params))]
    pub async fn query_first<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, &serde_json::Value)],
    ) -> Result<Option<T>, ContentStoreError> {
        let url = format!("{}/data/query/{}", self.api_url, self.dataset);
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${name}"), value.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&pairs)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await?;

        let body = check_status(response, "query").await?;
        let parsed: QueryResponse<T> = serde_json::from_str(&body)?;
        Ok(parsed.result)
    }

    /// Create a single document immediately (not staged).
    ///
    /// Returns the id the store assigned to the new document.
    ///
    /// # Errors
    ///
    /// Returns an error on non-success status, an unparseable body, or a
    /// response that carries no created id.
    #[instrument(skip(self, document))]
    pub async fn create<T: Serialize + Sync>(
        &self,
        document: &T,
    ) -> Result<String, ContentStoreError> {
        let body = json!({ "mutations": [{ "create": document }] });
        let response = self.mutate(&body).await?;

        response
            .results
            .into_iter()
            .next()
            .map(|result| result.id)
            .ok_or(ContentStoreError::UnexpectedResponse {
                operation: "create",
                detail: "no created document id in response".to_string(),
            })
    }

    /// Upload image bytes to the asset endpoint.
    ///
    /// Returns the id of the created asset document.
    ///
    /// # Errors
    ///
    /// Returns an error on non-success status or an unparseable body.
    #[instrument(skip(self, bytes), fields(filename = %filename, size = bytes.len()))]
    pub async fn upload_image_asset(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<String, ContentStoreError> {
        let url = format!("{}/assets/images/{}", self.api_url, self.dataset);

        let response = self
            .client
            .post(&url)
            .query(&[("filename", filename)])
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let body = check_status(response, "asset upload").await?;
        let parsed: AssetResponse = serde_json::from_str(&body)?;
        debug!(asset_id = %parsed.document.id, "Uploaded image asset");
        Ok(parsed.document.id)
    }

    /// Commit a staged transaction as one atomic mutate call.
    ///
    /// The store's transaction guarantee applies: either every staged upsert
    /// lands or none do.
    ///
    /// # Errors
    ///
    /// Returns an error on non-success status or an unparseable body.
    #[instrument(skip(self, transaction), fields(staged = transaction.len()))]
    pub async fn commit(
        &self,
        transaction: Transaction,
    ) -> Result<CommitSummary, ContentStoreError> {
        let committed = transaction.len();
        let body = json!({ "mutations": transaction.mutations });
        let response = self.mutate(&body).await?;

        Ok(CommitSummary {
            transaction_id: response.transaction_id,
            committed,
        })
    }

    async fn mutate(&self, body: &serde_json::Value) -> Result<MutateResponse, ContentStoreError> {
        let url = format!("{}/data/mutate/{}", self.api_url, self.dataset);

        let response = self
            .client
            .post(&url)
            .query(&[("returnIds", "true")])
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .await?;

        let text = check_status(response, "mutate").await?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Read the response body, rejecting non-success statuses with a truncated
/// body snippet for diagnostics.
async fn check_status(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<String, ContentStoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %body.chars().take(500).collect::<String>(),
            "Content store returned non-success status during {operation}"
        );
        return Err(ContentStoreError::UnexpectedStatus {
            operation,
            status: status.as_u16(),
            body: body.chars().take(200).collect(),
        });
    }

    Ok(body)
}
