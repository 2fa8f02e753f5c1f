//! JSON-RPC implementation of the ledger read surface.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::config::{RPC_GET_OBJECT, RPC_GET_OWNED_OBJECTS};
use crate::error::{VaultError, VaultResult};
use crate::traits::{LedgerObject, LedgerRpc};

/// JSON-RPC 2.0 client for a ledger fullnode endpoint.
pub struct JsonRpcLedger {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcLedger {
    pub fn new(url: &str, timeout: Duration) -> VaultResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VaultError::Validation(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn call(&self, method: &str, params: Value) -> VaultResult<Value> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VaultError::LedgerQuery(format!("RPC unreachable: {e}")))?;

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| VaultError::LedgerQuery(format!("RPC body unreadable: {e}")))?;

        if let Some(error) = envelope.get("error") {
            return Err(VaultError::LedgerQuery(format!("RPC error: {error}")));
        }

        envelope
            .get("result")
            .cloned()
            .ok_or_else(|| VaultError::LedgerQuery("RPC response carries no result".into()))
    }

    /// Pull `(id, fields)` out of one entry of an RPC object response.
    fn decode_entry(entry: &Value) -> Option<LedgerObject> {
        let data = entry.get("data")?;
        let id = data.get("objectId")?.as_str()?.to_string();
        let fields = data.get("content")?.get("fields")?.clone();
        Some(LedgerObject { id, fields })
    }
}

#[async_trait]
impl LedgerRpc for JsonRpcLedger {
    async fn get_object(&self, object_id: &str) -> VaultResult<LedgerObject> {
        let result = self
            .call(
                RPC_GET_OBJECT,
                json!([object_id, {"showContent": true}]),
            )
            .await?;

        Self::decode_entry(&result)
            .ok_or_else(|| VaultError::LedgerQuery(format!("object {object_id} has no content")))
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> VaultResult<Vec<LedgerObject>> {
        let result = self
            .call(
                RPC_GET_OWNED_OBJECTS,
                json!([
                    owner,
                    {
                        "filter": {"StructType": struct_type},
                        "options": {"showContent": true},
                    },
                ]),
            )
            .await?;

        let entries = result
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        // Entries without content (pruned or permission-filtered) are
        // dropped here; the gateway layer logs what it skips.
        Ok(entries.iter().filter_map(Self::decode_entry).collect())
    }

    async fn query_objects(&self, struct_type: &str) -> VaultResult<Vec<LedgerObject>> {
        let result = self
            .call(
                "suix_queryObjects",
                json!([
                    {
                        "filter": {"StructType": struct_type},
                        "options": {"showContent": true},
                    },
                ]),
            )
            .await?;

        let entries = result
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        Ok(entries.iter().filter_map(Self::decode_entry).collect())
    }
}
