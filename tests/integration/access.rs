//! Access flow: fetch, download, decrypt under the entitlement check.

use rentvault::mocks::BlobFailure;
use rentvault::{StorageOp, VaultError};

use crate::common::PipelineHarness;

const RENTER: &str = "0xrenter";
const LISTING: &str = "0xlisting";

/// Publish content and anchor it as a listing, the way a seller would.
async fn publish_listing(harness: &PipelineHarness, content: &[u8]) {
    let receipt = harness.pipeline.publish(content, 1).await.unwrap();
    harness.anchor_listing(LISTING, &receipt);
}

#[tokio::test]
async fn test_access_granted_returns_plaintext() {
    let harness = PipelineHarness::new();
    publish_listing(&harness, b"hello").await;
    harness.grant_access(RENTER, LISTING);

    let plaintext = harness.pipeline.access(LISTING, RENTER).await.unwrap();

    assert_eq!(plaintext, b"hello");
}

#[tokio::test]
async fn test_access_denied_returns_no_plaintext() {
    let harness = PipelineHarness::new();
    publish_listing(&harness, b"hello").await;
    // No grant: the verification script finds no valid pass.

    let err = harness.pipeline.access(LISTING, RENTER).await.unwrap_err();

    assert!(matches!(err, VaultError::EntitlementDenied(_)));
}

#[tokio::test]
async fn test_access_after_revocation_is_denied() {
    let harness = PipelineHarness::new();
    publish_listing(&harness, b"hello").await;
    harness.grant_access(RENTER, LISTING);

    assert!(harness.pipeline.access(LISTING, RENTER).await.is_ok());

    // The pass expired; the script stops granting.
    harness.network.revoke(RENTER, LISTING);

    let err = harness.pipeline.access(LISTING, RENTER).await.unwrap_err();
    assert!(matches!(err, VaultError::EntitlementDenied(_)));
}

#[tokio::test]
async fn test_access_is_scoped_per_listing() {
    let harness = PipelineHarness::new();
    publish_listing(&harness, b"hello").await;

    // A pass for some other listing does not unlock this one.
    harness.grant_access(RENTER, "0xother-listing");

    let err = harness.pipeline.access(LISTING, RENTER).await.unwrap_err();
    assert!(matches!(err, VaultError::EntitlementDenied(_)));
}

#[tokio::test]
async fn test_access_unknown_listing_surfaces_ledger_error() {
    let harness = PipelineHarness::new();

    let err = harness.pipeline.access("0xmissing", RENTER).await.unwrap_err();

    assert!(matches!(err, VaultError::LedgerQuery(_)));
}

#[tokio::test]
async fn test_access_with_storage_down_surfaces_download_failure() {
    let harness = PipelineHarness::new();
    publish_listing(&harness, b"hello").await;
    harness.grant_access(RENTER, LISTING);

    for node in &harness.nodes {
        node.set_fail_mode(Some(BlobFailure::Gets));
    }

    let err = harness.pipeline.access(LISTING, RENTER).await.unwrap_err();

    match err {
        VaultError::AllNodesFailed { op, failures } => {
            assert_eq!(op, StorageOp::Download);
            assert_eq!(failures.len(), harness.nodes.len());
        }
        other => panic!("expected AllNodesFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_access_rejects_empty_listing_id_locally() {
    let harness = PipelineHarness::new();

    let err = harness.pipeline.access("  ", RENTER).await.unwrap_err();

    assert!(matches!(err, VaultError::Validation(_)));
    assert_eq!(harness.network.decrypt_calls(), 0);
}
