//! Shared harness wiring the full pipeline over mocks.

use rentvault::mocks::{
    MemoryStore, MockBlobNode, MockLedgerRpc, MockRandom, MockThresholdNetwork, MockTime,
    SharedBlobStore,
};
use rentvault::{
    KeyReleaseClient, LedgerGateway, Pipeline, PublishReceipt, SessionManager, StorageFanout,
};
use serde_json::json;

/// Ledger package every harness pipeline is bound to.
pub const PACKAGE_ID: &str = "0xpkg";

pub type MockPipeline = Pipeline<
    MockBlobNode,
    MockThresholdNetwork,
    MockLedgerRpc,
    MemoryStore,
    MockTime,
    MockRandom,
>;

/// A complete pipeline over mocks, with handles to every collaborator
/// for seeding state and asserting on call counts.
pub struct PipelineHarness {
    pub time: MockTime,
    pub blob_store: SharedBlobStore,
    pub nodes: Vec<MockBlobNode>,
    pub network: MockThresholdNetwork,
    pub rpc: MockLedgerRpc,
    pub credential_store: MemoryStore,
    pub pipeline: MockPipeline,
}

impl PipelineHarness {
    /// Harness with two healthy storage nodes.
    pub fn new() -> Self {
        let blob_store = SharedBlobStore::new();
        let nodes = vec![blob_store.node("node-0"), blob_store.node("node-1")];
        Self::with_nodes(blob_store, nodes)
    }

    /// Harness over caller-built nodes (failure injection).
    pub fn with_nodes(blob_store: SharedBlobStore, nodes: Vec<MockBlobNode>) -> Self {
        let time = MockTime::new(1000);
        let network = MockThresholdNetwork::new();
        let rpc = MockLedgerRpc::new();
        let credential_store = MemoryStore::new();

        let sessions = SessionManager::new(
            credential_store.clone(),
            time.clone(),
            MockRandom::new(11),
            "https://market.test",
        );
        let pipeline = Pipeline::new(
            StorageFanout::new(nodes.clone(), nodes.clone()),
            KeyReleaseClient::new(network.clone(), sessions),
            LedgerGateway::new(rpc.clone(), PACKAGE_ID),
        );

        Self {
            time,
            blob_store,
            nodes,
            network,
            rpc,
            credential_store,
            pipeline,
        }
    }

    /// Anchor a publish receipt as an active listing, the step the
    /// wallet layer performs in production.
    pub fn anchor_listing(&self, listing_id: &str, receipt: &PublishReceipt) {
        self.rpc.insert_object(
            listing_id,
            json!({
                "seller": "0xseller",
                "blob_id": receipt.blob_id,
                "key_derivation_hash": receipt.key_derivation_hash,
                "base_price": "100",
                "price_slope": "10",
                "active_rentals": "0",
                "mime_type": "text/plain",
                "is_active": true,
            }),
        );
    }

    /// Let the mock verification script grant a requester access to a
    /// listing (what renting a pass buys).
    pub fn grant_access(&self, requester: &str, listing_id: &str) {
        self.network.grant(requester, listing_id);
    }
}

impl Default for PipelineHarness {
    fn default() -> Self {
        Self::new()
    }
}
