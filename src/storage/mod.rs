//! Ordered-failover client for the decentralized blob store.
//!
//! Any single storage endpoint is allowed to be down, slow, or wrong;
//! durability comes from trying an ordered list of interchangeable nodes
//! until one succeeds. Ordering is significant: configured list order,
//! no randomization, no liveness probing, trading worst-case latency
//! (dead nodes x per-node timeout) for simplicity.

pub mod http;

pub use http::{HttpBlobNode, StorageConfig, StorePath};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{StorageOp, VaultError, VaultResult};
use crate::traits::{BlobNode, NodeError, StoreReceipt};

/// One entry of the per-node diagnostic list carried by
/// [`VaultError::AllNodesFailed`]. Serialized verbatim into the upload
/// proxy's 503 body.
#[derive(Debug, Clone, Serialize)]
pub struct NodeFailure {
    pub node: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub error: String,
}

impl NodeFailure {
    pub fn new(node: impl Into<String>, status: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            status,
            error: error.into(),
        }
    }

    fn record(node: &str, err: NodeError) -> Self {
        Self::new(node, err.status, err.message)
    }
}

/// Fanout over an ordered list of write nodes (publishers) and an
/// ordered, possibly distinct list of read nodes (aggregators).
///
/// No local caching and no side effects beyond the network calls.
pub struct StorageFanout<N> {
    write_nodes: Vec<N>,
    read_nodes: Vec<N>,
}

impl<N: BlobNode> StorageFanout<N> {
    pub fn new(write_nodes: Vec<N>, read_nodes: Vec<N>) -> Self {
        Self {
            write_nodes,
            read_nodes,
        }
    }

    /// Store a payload, trying publishers in configured order.
    ///
    /// First success wins; later nodes are never contacted. When every
    /// node fails the error carries one diagnostic per node, in order.
    pub async fn upload(&self, payload: &[u8], epochs: u64) -> VaultResult<StoreReceipt> {
        let mut failures = Vec::with_capacity(self.write_nodes.len());

        for node in &self.write_nodes {
            match node.put(payload, epochs).await {
                Ok(receipt) => {
                    info!(
                        node = node.endpoint(),
                        blob_id = %receipt.blob_id,
                        "stored {} bytes",
                        payload.len()
                    );
                    return Ok(receipt);
                }
                Err(e) => {
                    warn!(node = node.endpoint(), "store attempt failed: {e}");
                    failures.push(NodeFailure::record(node.endpoint(), e));
                }
            }
        }

        Err(VaultError::AllNodesFailed {
            op: StorageOp::Upload,
            failures,
        })
    }

    /// Fetch a payload by blob id, trying aggregators in configured
    /// order. A 404 from one node just moves on to the next.
    pub async fn download(&self, blob_id: &str) -> VaultResult<Vec<u8>> {
        let mut failures = Vec::with_capacity(self.read_nodes.len());

        for node in &self.read_nodes {
            match node.get(blob_id).await {
                Ok(bytes) => {
                    debug!(node = node.endpoint(), blob_id, "fetched {} bytes", bytes.len());
                    return Ok(bytes);
                }
                Err(e) => {
                    warn!(node = node.endpoint(), blob_id, "fetch attempt failed: {e}");
                    failures.push(NodeFailure::record(node.endpoint(), e));
                }
            }
        }

        Err(VaultError::AllNodesFailed {
            op: StorageOp::Download,
            failures,
        })
    }
}
