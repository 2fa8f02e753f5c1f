//! Mock key-release network for testing.
//!
//! "Encryption" is the identity transform (the ciphertext is the
//! plaintext's transport encoding), which keeps payload assertions
//! readable while exercising every encoding boundary the real network
//! crosses: base64 out of encrypt, hex into decrypt.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::codec;
use crate::error::{VaultError, VaultResult};
use crate::traits::{DecryptRequest, EncryptRequest, EncryptResponse, ThresholdNetwork};

#[derive(Debug, Default)]
struct MockThresholdInner {
    connect_calls: AtomicU64,
    encrypt_calls: AtomicU64,
    decrypt_calls: AtomicU64,
    /// Artificial connection latency, to widen the dedup race window.
    connect_delay_ms: AtomicU64,
    /// Consecutive decrypts to reject as stale attestations.
    auth_failures_remaining: AtomicU32,
    /// `(requester, listing)` pairs the verification script grants.
    grants: Mutex<HashSet<(String, String)>>,
    /// Key-derivation hash handed out by encrypt.
    key_hash: Mutex<String>,
}

/// Scripted threshold network. Clones share state, so a test can hold
/// one handle for assertions while the client owns another.
#[derive(Debug, Clone)]
pub struct MockThresholdNetwork {
    inner: Arc<MockThresholdInner>,
}

impl Default for MockThresholdNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockThresholdNetwork {
    pub fn new() -> Self {
        let inner = MockThresholdInner::default();
        *inner.key_hash.lock() = "h1".to_string();
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Grant the verification script's check for one requester/listing
    /// pair. Everything not granted is denied.
    pub fn grant(&self, requester: &str, listing_id: &str) {
        self.inner
            .grants
            .lock()
            .insert((requester.to_string(), listing_id.to_string()));
    }

    /// Withdraw a previously granted pair (pass expired).
    pub fn revoke(&self, requester: &str, listing_id: &str) {
        self.inner
            .grants
            .lock()
            .remove(&(requester.to_string(), listing_id.to_string()));
    }

    /// Reject the next `n` decrypts with an authentication error.
    pub fn fail_auth_times(&self, n: u32) {
        self.inner.auth_failures_remaining.store(n, Ordering::SeqCst);
    }

    pub fn set_key_hash(&self, hash: &str) {
        *self.inner.key_hash.lock() = hash.to_string();
    }

    pub fn set_connect_delay_ms(&self, ms: u64) {
        self.inner.connect_delay_ms.store(ms, Ordering::SeqCst);
    }

    pub fn connect_calls(&self) -> u64 {
        self.inner.connect_calls.load(Ordering::SeqCst)
    }

    pub fn encrypt_calls(&self) -> u64 {
        self.inner.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> u64 {
        self.inner.decrypt_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ThresholdNetwork for MockThresholdNetwork {
    async fn connect(&self) -> VaultResult<()> {
        self.inner.connect_calls.fetch_add(1, Ordering::SeqCst);

        let delay = self.inner.connect_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        Ok(())
    }

    async fn encrypt(&self, request: &EncryptRequest) -> VaultResult<EncryptResponse> {
        self.inner.encrypt_calls.fetch_add(1, Ordering::SeqCst);

        if !request.auth_sig.is_consistent() {
            return Err(VaultError::AuthenticationInvalid(
                "attestation does not verify".into(),
            ));
        }

        Ok(EncryptResponse {
            ciphertext: request.data_to_encrypt.clone(),
            data_to_encrypt_hash: self.inner.key_hash.lock().clone(),
        })
    }

    async fn decrypt(&self, request: &DecryptRequest) -> VaultResult<Vec<u8>> {
        self.inner.decrypt_calls.fetch_add(1, Ordering::SeqCst);

        let remaining = self.inner.auth_failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.inner
                .auth_failures_remaining
                .store(remaining - 1, Ordering::SeqCst);
            return Err(VaultError::AuthenticationInvalid(
                "simulated stale attestation".into(),
            ));
        }

        if !request.auth_sig.is_consistent() {
            return Err(VaultError::AuthenticationInvalid(
                "attestation does not verify".into(),
            ));
        }

        let granted = self.inner.grants.lock().contains(&(
            request.js_params.user_address.clone(),
            request.js_params.listing_id.clone(),
        ));
        if !granted {
            return Err(VaultError::EntitlementDenied(
                "verification script found no valid pass".into(),
            ));
        }

        codec::hex_to_bytes(&request.ciphertext)
    }
}
