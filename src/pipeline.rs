//! Publish and access orchestration across the three external systems.
//!
//! One explicit context object owns the storage fanout, the key-release
//! client, and the ledger gateway; it is constructed once at application
//! start and passed by reference to every call. A stage failure aborts
//! the whole operation with that stage's typed error. There is no
//! compensating rollback, because nothing reaches the ledger until the
//! caller anchors the returned receipt through its wallet.

use tracing::{info, instrument};

use crate::error::{VaultError, VaultResult};
use crate::keyrelease::KeyReleaseClient;
use crate::ledger::LedgerGateway;
use crate::marketplace::PublishReceipt;
use crate::storage::StorageFanout;
use crate::traits::{
    BlobNode, CredentialStore, LedgerRpc, RandomSource, ThresholdNetwork, TimeProvider,
};

/// The composed publish/access pipeline.
pub struct Pipeline<B, N, L, S, T, R> {
    storage: StorageFanout<B>,
    keys: KeyReleaseClient<N, S, T, R>,
    ledger: LedgerGateway<L>,
}

impl<B, N, L, S, T, R> Pipeline<B, N, L, S, T, R>
where
    B: BlobNode,
    N: ThresholdNetwork,
    L: LedgerRpc,
    S: CredentialStore,
    T: TimeProvider,
    R: RandomSource,
{
    pub fn new(
        storage: StorageFanout<B>,
        keys: KeyReleaseClient<N, S, T, R>,
        ledger: LedgerGateway<L>,
    ) -> Self {
        Self {
            storage,
            keys,
            ledger,
        }
    }

    pub fn storage(&self) -> &StorageFanout<B> {
        &self.storage
    }

    pub fn keys(&self) -> &KeyReleaseClient<N, S, T, R> {
        &self.keys
    }

    pub fn ledger(&self) -> &LedgerGateway<L> {
        &self.ledger
    }

    /// Encrypt a file and store the ciphertext durably.
    ///
    /// Returns the identifiers the caller anchors on the ledger via a
    /// create-listing transaction; until that anchor lands, nothing is
    /// committed anywhere but the (content-addressed, idempotent) blob
    /// store.
    #[instrument(skip_all, fields(bytes = file.len()))]
    pub async fn publish(&self, file: &[u8], epochs: u64) -> VaultResult<PublishReceipt> {
        if file.is_empty() {
            return Err(VaultError::Validation("file is empty".into()));
        }

        let payload = self.keys.encrypt(file).await?;

        // The storage network stores the hex text itself, so download
        // can hand the ciphertext straight back to the key-release
        // network without re-encoding.
        let receipt = self
            .storage
            .upload(payload.ciphertext_hex.as_bytes(), epochs)
            .await?;

        info!(blob_id = %receipt.blob_id, "publish complete");

        Ok(PublishReceipt {
            blob_id: receipt.blob_id,
            key_derivation_hash: payload.key_derivation_hash,
        })
    }

    /// Fetch, download, and decrypt one listing's content for a
    /// requester, subject to the remote entitlement check.
    ///
    /// Either verified plaintext comes back or an error does; no
    /// partial result exists. Decrypt-stage errors surface verbatim so
    /// an entitlement denial stays distinguishable from a credential
    /// problem.
    #[instrument(skip(self))]
    pub async fn access(
        &self,
        listing_id: &str,
        requester_address: &str,
    ) -> VaultResult<Vec<u8>> {
        if listing_id.trim().is_empty() {
            return Err(VaultError::Validation("listing id is empty".into()));
        }

        let listing = self.ledger.fetch_listing(listing_id).await?;

        let blob = self.storage.download(&listing.storage_blob_id).await?;
        let ciphertext = String::from_utf8(blob).map_err(|e| {
            VaultError::Serialization(format!("stored ciphertext is not hex text: {e}"))
        })?;

        let plaintext = self
            .keys
            .decrypt(
                &ciphertext,
                &listing.key_derivation_hash,
                &listing.id,
                self.ledger.package_id(),
                requester_address,
            )
            .await?;

        info!(listing_id, "access complete");
        Ok(plaintext)
    }
}
