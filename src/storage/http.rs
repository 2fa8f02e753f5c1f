//! HTTP storage node implementation and response parsing.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;

use crate::config::STORAGE_NODE_TIMEOUT_SECS;
use crate::error::{VaultError, VaultResult};
use crate::traits::{BlobNode, NodeError, StoreReceipt};

/// Which write route a node deployment exposes. Both forms appear in the
/// field and are configured per fanout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorePath {
    /// `PUT /v1/store?epochs={n}`
    #[default]
    Store,
    /// `PUT /v1/blobs?epochs={n}`
    Blobs,
}

impl StorePath {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "/v1/store",
            Self::Blobs => "/v1/blobs",
        }
    }
}

/// Endpoint lists and per-node timeout for one storage fanout.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Write endpoints, tried in order.
    pub publishers: Vec<String>,
    /// Read endpoints, tried in order. May differ from the publishers.
    pub aggregators: Vec<String>,
    /// Bounded per-request timeout; a hung node costs at most this.
    pub timeout_secs: u64,
    /// Write route shape of the deployed network version.
    pub store_path: StorePath,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            publishers: Vec::new(),
            aggregators: Vec::new(),
            timeout_secs: STORAGE_NODE_TIMEOUT_SECS,
            store_path: StorePath::default(),
        }
    }
}

impl StorageConfig {
    /// Build the production fanout from this configuration.
    pub fn build(&self) -> VaultResult<super::StorageFanout<HttpBlobNode>> {
        let timeout = Duration::from_secs(self.timeout_secs);

        let write_nodes = self
            .publishers
            .iter()
            .map(|url| HttpBlobNode::new(url, self.store_path, timeout))
            .collect::<VaultResult<_>>()?;
        let read_nodes = self
            .aggregators
            .iter()
            .map(|url| HttpBlobNode::new(url, self.store_path, timeout))
            .collect::<VaultResult<_>>()?;

        Ok(super::StorageFanout::new(write_nodes, read_nodes))
    }
}

/// A single HTTP storage endpoint. Does exactly one request per call;
/// the timeout-triggered abort is the only cancellation primitive in
/// the pipeline.
pub struct HttpBlobNode {
    client: reqwest::Client,
    base_url: String,
    store_path: StorePath,
}

impl HttpBlobNode {
    pub fn new(base_url: &str, store_path: StorePath, timeout: Duration) -> VaultResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::Validation(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store_path,
        })
    }
}

#[async_trait]
impl BlobNode for HttpBlobNode {
    async fn put(&self, payload: &[u8], epochs: u64) -> Result<StoreReceipt, NodeError> {
        let url = format!(
            "{}{}?epochs={epochs}",
            self.base_url,
            self.store_path.as_str()
        );

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| NodeError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::new(
                Some(status.as_u16()),
                format!("unexpected status {status}"),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| NodeError::new(Some(status.as_u16()), format!("bad body: {e}")))?;

        parse_store_receipt(body)
    }

    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, NodeError> {
        let url = format!("{}/v1/blobs/{blob_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| NodeError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NodeError::new(
                Some(status.as_u16()),
                format!("unexpected status {status}"),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NodeError::new(Some(status.as_u16()), format!("bad body: {e}")))?;

        Ok(bytes.to_vec())
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}

/// The two valid success shapes for one semantic outcome: a fresh write
/// or an idempotent re-upload of already-certified content.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreResponse {
    newly_created: Option<NewlyCreated>,
    already_certified: Option<AlreadyCertified>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewlyCreated {
    blob_object: BlobObject,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobObject {
    blob_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlreadyCertified {
    blob_id: String,
}

/// Extract the blob id from a node's success body, keeping the raw JSON
/// alongside it.
pub fn parse_store_receipt(raw: Value) -> Result<StoreReceipt, NodeError> {
    let parsed: StoreResponse = serde_json::from_value(raw.clone())
        .map_err(|e| NodeError::new(None, format!("unrecognized store response: {e}")))?;

    let blob_id = parsed
        .newly_created
        .map(|n| n.blob_object.blob_id)
        .or(parsed.already_certified.map(|a| a.blob_id))
        .ok_or_else(|| NodeError::new(None, "store response carries no blob id"))?;

    Ok(StoreReceipt { blob_id, raw })
}
