//! Durable local key-value storage for credentials.
//!
//! Holds the signing key and the current session attestation. The
//! production implementation writes one file per key under a namespaced
//! data directory; tests use an in-memory map.

use crate::error::VaultResult;

/// Abstraction over the durable local store that keeps the signing
/// identity and the persisted session between process runs.
pub trait CredentialStore: Send + Sync {
    /// Read a value. `None` when the key was never written or was removed.
    fn get(&self, key: &str) -> VaultResult<Option<String>>;

    /// Write a value, overwriting any prior one.
    fn put(&self, key: &str, value: &str) -> VaultResult<()>;

    /// Remove a value. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> VaultResult<()>;
}
