//! The encrypted unit moved through the publish/access pipeline.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::VaultResult;

/// Ciphertext plus the key-derivation reference, as produced by one
/// encrypt call. Immutable once created; consumed read-only by the
/// storage fanout and again at decrypt time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPayload {
    /// Ciphertext normalized to hex text, the representation the
    /// storage network stores.
    pub ciphertext_hex: String,

    /// Opaque reference the key-release network needs to reconstruct
    /// the symmetric key. Never parsed here.
    pub key_derivation_hash: String,
}

impl EncryptedPayload {
    /// Build a payload from ciphertext fresh off the key-release
    /// network (base64), normalizing it to hex.
    pub fn from_network(ciphertext_base64: &str, key_derivation_hash: impl Into<String>) -> Self {
        Self {
            ciphertext_hex: codec::base64_to_hex(ciphertext_base64),
            key_derivation_hash: key_derivation_hash.into(),
        }
    }

    /// The raw ciphertext bytes.
    pub fn ciphertext_bytes(&self) -> VaultResult<Vec<u8>> {
        codec::hex_to_bytes(&self.ciphertext_hex)
    }
}

/// What `publish` hands back for the caller to anchor on the ledger
/// through its wallet layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Locator issued by the storage network.
    pub blob_id: String,

    /// Key-derivation reference to anchor alongside it.
    pub key_derivation_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_network_normalizes_base64() {
        let payload = EncryptedPayload::from_network("aGVsbG8=", "h1");

        assert_eq!(payload.ciphertext_hex, "68656c6c6f");
        assert_eq!(payload.key_derivation_hash, "h1");
        assert_eq!(payload.ciphertext_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_from_network_keeps_hex_unchanged() {
        let payload = EncryptedPayload::from_network("68656c6c6f", "h1");
        assert_eq!(payload.ciphertext_hex, "68656c6c6f");
    }
}
