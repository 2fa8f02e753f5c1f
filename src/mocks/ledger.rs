//! Mock ledger RPC for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{VaultError, VaultResult};
use crate::traits::{LedgerObject, LedgerRpc};

#[derive(Debug, Default)]
struct MockLedgerInner {
    /// Objects addressable by id.
    objects: Mutex<HashMap<String, Value>>,
    /// Owned objects: `(owner, struct_type)` -> `[(id, fields)]`.
    owned: Mutex<HashMap<(String, String), Vec<(String, Value)>>>,
    /// Shared objects: `struct_type` -> `[(id, fields)]`.
    shared: Mutex<HashMap<String, Vec<(String, Value)>>>,
    fail: AtomicBool,
}

/// In-memory ledger with seedable objects. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockLedgerRpc {
    inner: Arc<MockLedgerInner>,
}

impl MockLedgerRpc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every query fail (ledger unavailability).
    pub fn set_fail(&self, fail: bool) {
        self.inner.fail.store(fail, Ordering::SeqCst);
    }

    /// Seed an object fetchable by id.
    pub fn insert_object(&self, id: &str, fields: Value) {
        self.inner
            .objects
            .lock()
            .insert(id.to_string(), fields);
    }

    /// Seed an owned object (also fetchable by id).
    pub fn insert_owned(&self, owner: &str, struct_type: &str, id: &str, fields: Value) {
        self.insert_object(id, fields.clone());
        self.inner
            .owned
            .lock()
            .entry((owner.to_string(), struct_type.to_string()))
            .or_default()
            .push((id.to_string(), fields));
    }

    /// Seed a shared object (also fetchable by id).
    pub fn insert_shared(&self, struct_type: &str, id: &str, fields: Value) {
        self.insert_object(id, fields.clone());
        self.inner
            .shared
            .lock()
            .entry(struct_type.to_string())
            .or_default()
            .push((id.to_string(), fields));
    }

    fn check_available(&self) -> VaultResult<()> {
        if self.inner.fail.load(Ordering::SeqCst) {
            return Err(VaultError::LedgerQuery("simulated RPC failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRpc for MockLedgerRpc {
    async fn get_object(&self, object_id: &str) -> VaultResult<LedgerObject> {
        self.check_available()?;

        self.inner
            .objects
            .lock()
            .get(object_id)
            .cloned()
            .map(|fields| LedgerObject {
                id: object_id.to_string(),
                fields,
            })
            .ok_or_else(|| VaultError::LedgerQuery(format!("object {object_id} not found")))
    }

    async fn get_owned_objects(
        &self,
        owner: &str,
        struct_type: &str,
    ) -> VaultResult<Vec<LedgerObject>> {
        self.check_available()?;

        Ok(self
            .inner
            .owned
            .lock()
            .get(&(owner.to_string(), struct_type.to_string()))
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|(id, fields)| LedgerObject { id, fields })
            .collect())
    }

    async fn query_objects(&self, struct_type: &str) -> VaultResult<Vec<LedgerObject>> {
        self.check_available()?;

        Ok(self
            .inner
            .shared
            .lock()
            .get(struct_type)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|(id, fields)| LedgerObject { id, fields })
            .collect())
    }
}
