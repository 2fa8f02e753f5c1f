//! Storage failover behavior through the full pipeline.

use rentvault::mocks::{BlobFailure, SharedBlobStore};
use rentvault::VaultError;

use crate::common::PipelineHarness;

#[tokio::test]
async fn test_publish_fails_over_to_first_healthy_publisher() {
    let blob_store = SharedBlobStore::new();
    let nodes = vec![
        blob_store.failing_node("node-0", BlobFailure::All),
        blob_store.failing_node("node-1", BlobFailure::All),
        blob_store.node("node-2"),
        blob_store.node("node-3"),
    ];
    let harness = PipelineHarness::with_nodes(blob_store, nodes);

    let receipt = harness.pipeline.publish(b"hello", 1).await.unwrap();

    assert!(harness.blob_store.stored(&receipt.blob_id).is_some());

    // Dead nodes were each tried once; the success stopped the scan
    // before the last node.
    assert_eq!(harness.nodes[0].put_calls(), 1);
    assert_eq!(harness.nodes[1].put_calls(), 1);
    assert_eq!(harness.nodes[2].put_calls(), 1);
    assert_eq!(harness.nodes[3].put_calls(), 0);
}

#[tokio::test]
async fn test_access_fails_over_on_reads_independently_of_writes() {
    let blob_store = SharedBlobStore::new();
    let nodes = vec![
        blob_store.failing_node("node-0", BlobFailure::Gets),
        blob_store.node("node-1"),
    ];
    let harness = PipelineHarness::with_nodes(blob_store, nodes);

    // Writes go through node-0 (its failure mode only affects reads).
    let receipt = harness.pipeline.publish(b"hello", 1).await.unwrap();
    harness.anchor_listing("0xlisting", &receipt);
    harness.grant_access("0xrenter", "0xlisting");

    let plaintext = harness.pipeline.access("0xlisting", "0xrenter").await.unwrap();

    assert_eq!(plaintext, b"hello");
    assert_eq!(harness.nodes[0].get_calls(), 1);
    assert_eq!(harness.nodes[1].get_calls(), 1);
}

#[tokio::test]
async fn test_exhaustion_diagnostics_preserve_configured_order() {
    let blob_store = SharedBlobStore::new();
    let nodes = vec![
        blob_store.failing_node("alpha", BlobFailure::All),
        blob_store.failing_node("bravo", BlobFailure::All),
        blob_store.failing_node("charlie", BlobFailure::All),
    ];
    let harness = PipelineHarness::with_nodes(blob_store, nodes);

    let err = harness.pipeline.publish(b"hello", 1).await.unwrap_err();

    match err {
        VaultError::AllNodesFailed { failures, .. } => {
            let order: Vec<_> = failures.iter().map(|f| f.node.as_str()).collect();
            assert_eq!(order, ["alpha", "bravo", "charlie"]);
        }
        other => panic!("expected AllNodesFailed, got {other:?}"),
    }
}
