//! Key-release network abstraction for testable policy-gated crypto.
//!
//! The remote threshold network holds the key shares. Encryption and
//! decryption both happen on the network's side; the client only moves
//! payloads, policies, and attestations across the wire.

use async_trait::async_trait;

use crate::error::VaultResult;
use crate::keyrelease::policy::{AccessControlConditions, ScriptParams};
use crate::session::Session;

/// Payload submitted for policy-gated encryption.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    /// Gate checked at encrypt time. Deliberately trivial (a
    /// self-consistent signature); the real gate is the verification
    /// script executed at decrypt time.
    pub access_control_conditions: AccessControlConditions,
    /// Plaintext, base64-encoded for transport.
    pub data_to_encrypt: String,
    /// Session attestation authenticating the caller.
    pub auth_sig: Session,
    /// Ledger chain the policy refers to.
    pub chain: String,
}

/// What the network hands back after encrypting.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptResponse {
    /// Fresh ciphertext, base64-encoded.
    pub ciphertext: String,
    /// Opaque reference the network needs to reconstruct the symmetric
    /// key later. Never parsed client-side.
    pub data_to_encrypt_hash: String,
}

/// Payload submitted for entitlement-checked decryption.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub access_control_conditions: AccessControlConditions,
    /// Ciphertext, hex-normalized.
    pub ciphertext: String,
    /// Key-derivation reference captured at encrypt time.
    pub data_to_encrypt_hash: String,
    /// Source of the verification script the network executes before
    /// releasing key shares.
    pub code: String,
    /// Parameters the script consumes.
    pub js_params: ScriptParams,
    pub auth_sig: Session,
    pub chain: String,
}

/// Abstraction over the remote threshold-cryptography network.
#[async_trait]
pub trait ThresholdNetwork: Send + Sync {
    /// Establish the network connection. Callers go through the
    /// de-duplicating guard on [`crate::keyrelease::KeyReleaseClient`];
    /// implementations need not be concurrency-safe against double
    /// connects.
    async fn connect(&self) -> VaultResult<()>;

    /// Encrypt a payload under the given access policy.
    async fn encrypt(&self, request: &EncryptRequest) -> VaultResult<EncryptResponse>;

    /// Run the verification script remotely and, on a grant, reconstruct
    /// the key and return the plaintext. Denials and stale attestations
    /// come back as distinct error classes.
    async fn decrypt(&self, request: &DecryptRequest) -> VaultResult<Vec<u8>>;
}
