//! File-backed credential store.
//!
//! One file per key under a namespaced local data directory. Survives
//! process restarts, which is what keeps the signing identity stable and
//! lets sessions be reused across runs.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::config::default_data_dir;
use crate::error::{VaultError, VaultResult};
use crate::traits::CredentialStore;

/// Durable store writing each key as a file under `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Store rooted at the platform data directory (or
    /// `RENTVAULT_DATA_DIR` when set).
    pub fn new() -> Self {
        Self::with_root(default_data_dir())
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> VaultResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VaultError::Store(format!("read of '{key}' failed: {e}"))),
        }
    }

    fn put(&self, key: &str, value: &str) -> VaultResult<()> {
        fs::create_dir_all(&self.root)
            .map_err(|e| VaultError::Store(format!("creating data dir failed: {e}")))?;
        fs::write(self.path_for(key), value)
            .map_err(|e| VaultError::Store(format!("write of '{key}' failed: {e}")))
    }

    fn remove(&self, key: &str) -> VaultResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(VaultError::Store(format!("remove of '{key}' failed: {e}"))),
        }
    }
}
