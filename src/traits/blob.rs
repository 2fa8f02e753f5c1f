//! Storage node abstraction for testable blob operations.

use async_trait::async_trait;
use serde_json::Value;

/// Failure of a single node attempt: transport error, timeout, non-2xx
/// status, or an unparseable body. The fanout records these per node and
/// moves on to the next endpoint.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct NodeError {
    /// HTTP status when the node answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl NodeError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Network-level failure with no HTTP status (refused, timed out).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

/// Outcome of a successful blob write.
///
/// `raw` keeps the node's native JSON body so the upload proxy can pass
/// it through verbatim; the pipeline only consumes `blob_id`.
#[derive(Debug, Clone)]
pub struct StoreReceipt {
    /// Network-issued identifier for the stored blob.
    pub blob_id: String,
    /// The node's full response body.
    pub raw: Value,
}

/// Abstraction over a single storage endpoint.
///
/// The fanout client composes an ordered list of these and fails over
/// between them; implementations do exactly one request per call.
#[async_trait]
pub trait BlobNode: Send + Sync {
    /// Store a payload for `epochs` storage epochs.
    ///
    /// A node may answer with a newly-created descriptor or an
    /// already-certified one (idempotent re-upload of identical
    /// content); both resolve to the same receipt.
    async fn put(&self, payload: &[u8], epochs: u64) -> Result<StoreReceipt, NodeError>;

    /// Fetch a payload by its blob id. An unknown id (404) is an
    /// ordinary node failure, not a distinct outcome.
    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, NodeError>;

    /// Endpoint label used in per-node failure diagnostics.
    fn endpoint(&self) -> &str;
}
