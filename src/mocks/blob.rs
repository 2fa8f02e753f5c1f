//! Mock storage nodes for testing the fanout client.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;

use crate::traits::{BlobNode, NodeError, StoreReceipt};

/// Types of failures a mock node can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobFailure {
    /// Fail every operation.
    All,
    /// Fail only writes.
    Puts,
    /// Fail only reads.
    Gets,
}

#[derive(Debug, Default)]
struct SharedBlobInner {
    /// Blob contents keyed by blob id, shared by every node view.
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    /// Forced id for the next fresh write (lets tests pin "b1").
    next_blob_id: Mutex<Option<String>>,
}

/// Handle to shared blob storage for creating per-node views.
///
/// All nodes created from one handle see the same stored content, the
/// way independent publishers and aggregators front one replicated
/// network.
#[derive(Debug, Clone, Default)]
pub struct SharedBlobStore {
    inner: Arc<SharedBlobInner>,
}

impl SharedBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a healthy node view.
    pub fn node(&self, endpoint: &str) -> MockBlobNode {
        MockBlobNode {
            inner: self.inner.clone(),
            endpoint: endpoint.to_string(),
            fail_mode: Arc::new(Mutex::new(None)),
            put_calls: Arc::new(AtomicU64::new(0)),
            get_calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create a node view that simulates failures.
    pub fn failing_node(&self, endpoint: &str, failure: BlobFailure) -> MockBlobNode {
        let node = self.node(endpoint);
        *node.fail_mode.lock() = Some(failure);
        node
    }

    /// Pin the id the next fresh write receives.
    pub fn set_next_blob_id(&self, blob_id: &str) {
        *self.inner.next_blob_id.lock() = Some(blob_id.to_string());
    }

    /// Read a stored blob directly (assertion helper).
    pub fn stored(&self, blob_id: &str) -> Option<Vec<u8>> {
        self.inner.blobs.lock().get(blob_id).cloned()
    }

    /// Seed a blob without going through a node.
    pub fn insert(&self, blob_id: &str, payload: Vec<u8>) {
        self.inner.blobs.lock().insert(blob_id.to_string(), payload);
    }
}

/// One mock storage endpoint over the shared store.
#[derive(Debug, Clone)]
pub struct MockBlobNode {
    inner: Arc<SharedBlobInner>,
    endpoint: String,
    fail_mode: Arc<Mutex<Option<BlobFailure>>>,
    put_calls: Arc<AtomicU64>,
    get_calls: Arc<AtomicU64>,
}

impl MockBlobNode {
    pub fn set_fail_mode(&self, failure: Option<BlobFailure>) {
        *self.fail_mode.lock() = failure;
    }

    /// How many writes reached this node (shared across clones).
    pub fn put_calls(&self) -> u64 {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// How many reads reached this node (shared across clones).
    pub fn get_calls(&self) -> u64 {
        self.get_calls.load(Ordering::SeqCst)
    }

    fn fails(&self, writing: bool) -> bool {
        match *self.fail_mode.lock() {
            Some(BlobFailure::All) => true,
            Some(BlobFailure::Puts) => writing,
            Some(BlobFailure::Gets) => !writing,
            None => false,
        }
    }

    /// Content-addressed id, stable for identical payloads.
    fn derive_blob_id(payload: &[u8]) -> String {
        let mut hasher = DefaultHasher::new();
        payload.hash(&mut hasher);
        format!("blob-{:016x}", hasher.finish())
    }
}

#[async_trait]
impl BlobNode for MockBlobNode {
    async fn put(&self, payload: &[u8], _epochs: u64) -> Result<StoreReceipt, NodeError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);

        if self.fails(true) {
            return Err(NodeError::transport("simulated node failure"));
        }

        let mut blobs = self.inner.blobs.lock();

        // Identical content already certified: idempotent outcome.
        if let Some((existing_id, _)) = blobs
            .iter()
            .find(|(_, stored)| stored.as_slice() == payload)
        {
            let raw = json!({"alreadyCertified": {"blobId": existing_id}});
            return Ok(StoreReceipt {
                blob_id: existing_id.clone(),
                raw,
            });
        }

        let blob_id = self
            .inner
            .next_blob_id
            .lock()
            .take()
            .unwrap_or_else(|| Self::derive_blob_id(payload));

        blobs.insert(blob_id.clone(), payload.to_vec());
        let raw = json!({"newlyCreated": {"blobObject": {"blobId": blob_id}}});

        Ok(StoreReceipt { blob_id, raw })
    }

    async fn get(&self, blob_id: &str) -> Result<Vec<u8>, NodeError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if self.fails(false) {
            return Err(NodeError::transport("simulated node failure"));
        }

        self.inner
            .blobs
            .lock()
            .get(blob_id)
            .cloned()
            .ok_or_else(|| NodeError::new(Some(404), format!("blob {blob_id} not found")))
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_nodes_share_stored_content() {
        let store = SharedBlobStore::new();
        let publisher = store.node("publisher");
        let aggregator = store.node("aggregator");

        let receipt = publisher.put(b"payload", 1).await.unwrap();
        let bytes = aggregator.get(&receipt.blob_id).await.unwrap();

        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn test_pinned_blob_id() {
        let store = SharedBlobStore::new();
        store.set_next_blob_id("b1");

        let receipt = store.node("n").put(b"payload", 1).await.unwrap();

        assert_eq!(receipt.blob_id, "b1");
        assert_eq!(store.stored("b1").unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_fail_mode_is_directional() {
        let store = SharedBlobStore::new();
        let node = store.failing_node("n", BlobFailure::Gets);

        let receipt = node.put(b"payload", 1).await.unwrap();
        assert!(node.get(&receipt.blob_id).await.is_err());
    }
}
