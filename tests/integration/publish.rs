//! Publish flow: encrypt, store, hand back anchors.

use rentvault::mocks::{BlobFailure, SharedBlobStore};
use rentvault::{StorageOp, VaultError};

use crate::common::PipelineHarness;

#[tokio::test]
async fn test_publish_returns_blob_id_and_key_hash() {
    let harness = PipelineHarness::new();
    harness.blob_store.set_next_blob_id("b1");
    harness.network.set_key_hash("h1");

    let receipt = harness.pipeline.publish(b"hello", 1).await.unwrap();

    assert_eq!(receipt.blob_id, "b1");
    assert_eq!(receipt.key_derivation_hash, "h1");
}

#[tokio::test]
async fn test_publish_stores_hex_ciphertext_text() {
    let harness = PipelineHarness::new();
    harness.blob_store.set_next_blob_id("b1");

    harness.pipeline.publish(b"hello", 1).await.unwrap();

    // The blob is the hex rendering of the ciphertext; for the mock
    // network's identity encryption, the hex of "hello" itself.
    assert_eq!(harness.blob_store.stored("b1").unwrap(), b"68656c6c6f");
}

#[tokio::test]
async fn test_publish_rejects_empty_file_before_any_network_call() {
    let harness = PipelineHarness::new();

    let err = harness.pipeline.publish(b"", 1).await.unwrap_err();

    assert!(matches!(err, VaultError::Validation(_)));
    assert_eq!(harness.network.encrypt_calls(), 0);
    assert_eq!(harness.nodes[0].put_calls(), 0);
}

#[tokio::test]
async fn test_publish_with_all_storage_down_fails_without_partial_state() {
    let blob_store = SharedBlobStore::new();
    let nodes = vec![
        blob_store.failing_node("node-0", BlobFailure::All),
        blob_store.failing_node("node-1", BlobFailure::All),
        blob_store.failing_node("node-2", BlobFailure::All),
    ];
    let harness = PipelineHarness::with_nodes(blob_store, nodes);

    let err = harness.pipeline.publish(b"hello", 1).await.unwrap_err();

    match err {
        VaultError::AllNodesFailed { op, failures } => {
            assert_eq!(op, StorageOp::Upload);
            assert_eq!(failures.len(), 3);
        }
        other => panic!("expected AllNodesFailed, got {other:?}"),
    }

    // Nothing was stored, so there is nothing for a caller to anchor.
    assert!(harness.blob_store.stored("b1").is_none());
}

#[tokio::test]
async fn test_republishing_identical_file_reuses_the_blob() {
    let harness = PipelineHarness::new();

    let first = harness.pipeline.publish(b"same file", 1).await.unwrap();
    let second = harness.pipeline.publish(b"same file", 1).await.unwrap();

    assert_eq!(first.blob_id, second.blob_id);
}
