//! Ledger RPC abstraction for testable marketplace queries.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::VaultResult;

/// A raw ledger object: its id plus the untyped field record exactly as
/// the RPC returned it. The gateway owns the one canonical decoding per
/// entity type.
#[derive(Debug, Clone)]
pub struct LedgerObject {
    pub id: String,
    pub fields: Value,
}

/// Abstraction over the ledger's read-only JSON-RPC surface.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch a single object by id.
    async fn get_object(&self, object_id: &str) -> VaultResult<LedgerObject>;

    /// Fetch all objects of `struct_type` owned by `owner`.
    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> VaultResult<Vec<LedgerObject>>;

    /// Fetch all shared marketplace objects of `struct_type` (listing
    /// discovery).
    async fn query_objects(&self, struct_type: &str) -> VaultResult<Vec<LedgerObject>>;
}
