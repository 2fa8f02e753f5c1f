//! In-memory credential store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::VaultResult;
use crate::traits::CredentialStore;

/// Credential store backed by a shared in-memory map. Clones share the
/// same storage, mirroring how two session managers in one process see
/// the same durable state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> VaultResult<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        self.values.lock().remove(key);
        Ok(())
    }
}
