//! Read-model queries and transaction construction against the ledger.
//!
//! Reads map raw on-chain field records to typed domain records through
//! one canonical decoder per entity. Writes are construction-only: the
//! builders return serializable transaction descriptions for the
//! caller's wallet layer to sign and submit; this module performs no
//! entitlement-changing I/O itself.

pub mod rpc;
pub mod tx;

pub use rpc::JsonRpcLedger;
pub use tx::{
    build_create_listing_tx, build_pause_tx, build_rent_access_tx, build_resume_tx,
    build_withdraw_tx, TransactionSpec, TxArg,
};

use tracing::warn;

use crate::config::LEDGER_MODULE;
use crate::error::VaultResult;
use crate::marketplace::{AccessPass, Listing};
use crate::traits::LedgerRpc;

/// Read-only gateway over the marketplace's ledger entities.
pub struct LedgerGateway<L> {
    rpc: L,
    package_id: String,
}

impl<L: LedgerRpc> LedgerGateway<L> {
    pub fn new(rpc: L, package_id: impl Into<String>) -> Self {
        Self {
            rpc,
            package_id: package_id.into(),
        }
    }

    pub fn package_id(&self) -> &str {
        &self.package_id
    }

    fn listing_type(&self) -> String {
        format!("{}::{}::Listing", self.package_id, LEDGER_MODULE)
    }

    fn pass_type(&self) -> String {
        format!("{}::{}::AccessPass", self.package_id, LEDGER_MODULE)
    }

    /// Fetch one listing by id. Single-entity fetches surface RPC and
    /// shape errors instead of defaulting.
    pub async fn fetch_listing(&self, listing_id: &str) -> VaultResult<Listing> {
        let object = self.rpc.get_object(listing_id).await?;
        Listing::from_ledger_fields(object.id, &object.fields)
    }

    /// Fetch all listings for discovery. Degrades to an empty list on
    /// RPC failure and skips malformed entries, so the marketplace stays
    /// browsable when the ledger hiccups.
    pub async fn fetch_listings(&self) -> Vec<Listing> {
        let objects = match self.rpc.query_objects(&self.listing_type()).await {
            Ok(objects) => objects,
            Err(e) => {
                warn!("listing discovery query failed, showing none: {e}");
                return Vec::new();
            }
        };

        objects
            .into_iter()
            .filter_map(|object| match Listing::from_ledger_fields(object.id, &object.fields) {
                Ok(listing) => Some(listing),
                Err(e) => {
                    warn!("skipping malformed listing object: {e}");
                    None
                }
            })
            .collect()
    }

    /// Fetch the entitlement passes an address holds. Informational
    /// only; the authoritative check happens inside the key-release
    /// network's verification script. Degrades like the listing query.
    pub async fn fetch_user_passes(&self, owner_address: &str) -> Vec<AccessPass> {
        let objects = match self
            .rpc
            .get_owned_objects(owner_address, &self.pass_type())
            .await
        {
            Ok(objects) => objects,
            Err(e) => {
                warn!("pass query failed for {owner_address}, showing none: {e}");
                return Vec::new();
            }
        };

        objects
            .into_iter()
            .filter_map(
                |object| match AccessPass::from_ledger_fields(object.id, &object.fields) {
                    Ok(pass) => Some(pass),
                    Err(e) => {
                        warn!("skipping malformed pass object: {e}");
                        None
                    }
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockLedgerRpc;
    use serde_json::json;

    fn listing_fields() -> serde_json::Value {
        json!({
            "seller": "0xseller",
            "blob_id": "b1",
            "key_derivation_hash": "h1",
            "base_price": "100",
            "price_slope": "10",
            "active_rentals": "0",
            "mime_type": "text/plain",
            "is_active": true,
        })
    }

    #[tokio::test]
    async fn test_fetch_listing_decodes_canonical_fields() {
        let rpc = MockLedgerRpc::new();
        rpc.insert_object("0xlisting", listing_fields());
        let gateway = LedgerGateway::new(rpc, "0xpkg");

        let listing = gateway.fetch_listing("0xlisting").await.unwrap();

        assert_eq!(listing.id, "0xlisting");
        assert_eq!(listing.storage_blob_id, "b1");
        assert_eq!(listing.current_price(), 100);
    }

    #[tokio::test]
    async fn test_fetch_listing_surfaces_rpc_errors() {
        let rpc = MockLedgerRpc::new();
        rpc.set_fail(true);
        let gateway = LedgerGateway::new(rpc, "0xpkg");

        assert!(gateway.fetch_listing("0xlisting").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_listings_degrades_to_empty_on_rpc_error() {
        let rpc = MockLedgerRpc::new();
        rpc.set_fail(true);
        let gateway = LedgerGateway::new(rpc, "0xpkg");

        assert!(gateway.fetch_listings().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_listings_skips_malformed_objects() {
        let rpc = MockLedgerRpc::new();
        rpc.insert_shared("0xpkg::rental::Listing", "0xgood", listing_fields());
        rpc.insert_shared("0xpkg::rental::Listing", "0xbad", json!("not-an-object"));
        let gateway = LedgerGateway::new(rpc, "0xpkg");

        let listings = gateway.fetch_listings().await;

        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "0xgood");
    }

    #[tokio::test]
    async fn test_fetch_user_passes_filters_by_owner() {
        let rpc = MockLedgerRpc::new();
        rpc.insert_owned(
            "0xrenter",
            "0xpkg::rental::AccessPass",
            "0xpass",
            json!({"listing_id": "0xlisting", "owner": "0xrenter", "expiry": "9000"}),
        );
        let gateway = LedgerGateway::new(rpc, "0xpkg");

        let passes = gateway.fetch_user_passes("0xrenter").await;
        assert_eq!(passes.len(), 1);
        assert!(passes[0].is_valid_at(8999));

        assert!(gateway.fetch_user_passes("0xother").await.is_empty());
    }
}
