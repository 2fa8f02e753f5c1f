//! Entitlement passes: ledger-recorded, time-limited decryption rights.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{VaultError, VaultResult};
use crate::marketplace::listing::{field_str, field_u64};

/// A time-limited right to decrypt one specific listing's content,
/// owned by one address.
///
/// The client-side view is informational: the authoritative entitlement
/// check is performed by the verification script the key-release network
/// executes, which queries the ledger for these same objects itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPass {
    /// Ledger object id.
    pub id: String,

    /// Listing this pass unlocks.
    pub listing_id: String,

    /// Address holding the pass.
    pub owner_address: String,

    /// Unix timestamp (seconds) after which the pass no longer grants
    /// decryption.
    pub expiry: u64,
}

impl AccessPass {
    /// Canonical decoding from the ledger's raw field record, matching
    /// the on-chain snake_case schema. Absent optional fields default.
    pub fn from_ledger_fields(id: impl Into<String>, fields: &Value) -> VaultResult<Self> {
        let fields = fields
            .as_object()
            .ok_or_else(|| VaultError::LedgerQuery("pass fields are not an object".into()))?;

        Ok(Self {
            id: id.into(),
            listing_id: field_str(fields, "listing_id"),
            owner_address: field_str(fields, "owner"),
            expiry: field_u64(fields, "expiry"),
        })
    }

    /// Whether the pass still grants decryption at `now`.
    pub const fn is_valid_at(&self, now: u64) -> bool {
        self.expiry > now
    }
}
