//! Session lifecycle across pipeline operations.

use rentvault::config::{SESSION_STORE_KEY, SESSION_TTL_SECS};
use rentvault::{CredentialStore, Session, VaultError};

use crate::common::PipelineHarness;

fn stored_session(harness: &PipelineHarness) -> Option<Session> {
    harness
        .credential_store
        .get(SESSION_STORE_KEY)
        .unwrap()
        .map(|raw| serde_json::from_str(&raw).unwrap())
}

#[tokio::test]
async fn test_session_is_reused_across_operations() {
    let harness = PipelineHarness::new();

    harness.pipeline.publish(b"first", 1).await.unwrap();
    let first = stored_session(&harness).unwrap();

    harness.pipeline.publish(b"second", 1).await.unwrap();
    let second = stored_session(&harness).unwrap();

    // Same persisted attestation, no re-signing between operations.
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_expired_session_is_replaced_with_a_later_one() {
    let harness = PipelineHarness::new();

    harness.pipeline.publish(b"first", 1).await.unwrap();
    let first = stored_session(&harness).unwrap();

    harness.time.advance(SESSION_TTL_SECS + 1);

    harness.pipeline.publish(b"second", 1).await.unwrap();
    let second = stored_session(&harness).unwrap();

    assert!(second.expiry > first.expiry);
    assert_eq!(second.address, first.address, "identity must not rotate");
}

#[tokio::test]
async fn test_auth_rejection_during_access_recovers_once() {
    let harness = PipelineHarness::new();
    let receipt = harness.pipeline.publish(b"hello", 1).await.unwrap();
    harness.anchor_listing("0xlisting", &receipt);
    harness.grant_access("0xrenter", "0xlisting");

    let before = stored_session(&harness).unwrap();
    harness.network.fail_auth_times(1);

    let plaintext = harness.pipeline.access("0xlisting", "0xrenter").await.unwrap();

    assert_eq!(plaintext, b"hello");
    let after = stored_session(&harness).unwrap();
    assert_ne!(before, after, "recovery must mint a fresh session");
}

#[tokio::test]
async fn test_repeated_auth_rejection_surfaces_to_the_caller() {
    let harness = PipelineHarness::new();
    let receipt = harness.pipeline.publish(b"hello", 1).await.unwrap();
    harness.anchor_listing("0xlisting", &receipt);
    harness.grant_access("0xrenter", "0xlisting");

    let decrypts_before = harness.network.decrypt_calls();
    harness.network.fail_auth_times(2);

    let err = harness.pipeline.access("0xlisting", "0xrenter").await.unwrap_err();

    assert!(matches!(err, VaultError::AuthenticationInvalid(_)));
    // Exactly the original call plus the single retry.
    assert_eq!(harness.network.decrypt_calls() - decrypts_before, 2);
}
