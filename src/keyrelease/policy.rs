//! The entitlement policy the key-release network enforces.
//!
//! The script below is executed by the network itself, never locally.
//! It re-derives entitlement by querying the ledger directly, so no
//! client-supplied claim is ever trusted. That is the trust boundary the
//! whole design protects.

use serde::Serialize;

use crate::config::LEDGER_CHAIN;

/// Access gate checked at encrypt time and attached to every request.
///
/// Deliberately trivial: the caller must present a signature consistent
/// with its own address. The real gate is [`ENTITLEMENT_SCRIPT`],
/// executed at decrypt time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlConditions {
    pub chain: String,
    pub method: String,
    pub parameters: Vec<String>,
    pub return_value_test: ReturnValueTest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnValueTest {
    pub comparator: String,
    pub value: String,
}

impl AccessControlConditions {
    /// "The caller is whoever signed the attestation", nothing more.
    pub fn self_signed() -> Self {
        Self {
            chain: LEDGER_CHAIN.to_string(),
            method: String::new(),
            parameters: vec![":userAddress".to_string()],
            return_value_test: ReturnValueTest {
                comparator: "=".to_string(),
                value: ":userAddress".to_string(),
            },
        }
    }
}

/// Parameters the verification script consumes, serialized as
/// `{userAddress, listingId, packageId}` on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptParams {
    /// Address whose entitlement passes the script inspects.
    pub user_address: String,
    /// Listing the passes must match.
    pub listing_id: String,
    /// Ledger package the pass type lives under.
    pub package_id: String,
}

/// Source of the verification script.
///
/// Runs inside the key-release network with `userAddress`, `listingId`,
/// and `packageId` bound from the request's script parameters, plus the
/// runtime-provided `ledgerRpcUrl` and `respond` bindings. Performs its
/// own ledger RPC call; field names follow the on-chain snake_case
/// schema. Key shares are released only on a `"grant"` response.
pub const ENTITLEMENT_SCRIPT: &str = r#"
(async () => {
  const rpcBody = {
    jsonrpc: "2.0",
    id: 1,
    method: "suix_getOwnedObjects",
    params: [
      userAddress,
      {
        filter: { StructType: packageId + "::rental::AccessPass" },
        options: { showContent: true },
      },
    ],
  };

  const response = await fetch(ledgerRpcUrl, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(rpcBody),
  });
  const result = await response.json();

  const now = Math.floor(Date.now() / 1000);
  const entries = (result.result && result.result.data) || [];
  const granted = entries.some((entry) => {
    const fields =
      entry.data && entry.data.content && entry.data.content.fields;
    if (!fields) return false;
    return fields.listing_id === listingId && Number(fields.expiry) > now;
  });

  respond(granted ? "grant" : "deny");
})();
"#;
