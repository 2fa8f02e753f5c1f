//! Configuration constants for the marketplace pipeline.
//!
//! This module centralizes magic numbers and configuration values
//! to improve maintainability and enable easier tuning.

use std::path::PathBuf;

/// How long a session attestation stays valid (7 days).
pub const SESSION_TTL_SECS: u64 = 7 * 24 * 3600;

/// Fixed credential-store key for the persisted session attestation.
pub const SESSION_STORE_KEY: &str = "session";

/// Fixed credential-store key for the persisted signing key.
pub const IDENTITY_STORE_KEY: &str = "signing-key";

/// Authorization sentence embedded in every session challenge statement.
pub const SESSION_AUTH_STATEMENT: &str =
    "is requesting authorization to access encrypted marketplace content.";

/// Protocol version marker carried in the challenge statement.
pub const SESSION_PROTOCOL_VERSION: &str = "1";

/// Size of the random nonce in the challenge statement.
pub const SESSION_NONCE_BYTES: usize = 16;

/// Per-node timeout for storage fanout requests (applies to both
/// publishers and aggregators). A hung node costs at most this long
/// before the next node is tried.
pub const STORAGE_NODE_TIMEOUT_SECS: u64 = 30;

/// Default number of storage epochs a blob is certified for.
pub const DEFAULT_STORAGE_EPOCHS: u64 = 1;

/// Poll interval while waiting on an in-flight key-release connection.
pub const CONNECT_POLL_INTERVAL_MS: u64 = 100;

/// Chain identifier presented to the key-release network.
pub const LEDGER_CHAIN: &str = "sui";

/// Ledger module the marketplace entity types live under.
pub const LEDGER_MODULE: &str = "rental";

/// JSON-RPC method for owned-object queries, used by the ledger gateway
/// and, independently, by the verification script the key-release
/// network executes.
pub const RPC_GET_OWNED_OBJECTS: &str = "suix_getOwnedObjects";

/// JSON-RPC method for single-object fetches.
pub const RPC_GET_OBJECT: &str = "sui_getObject";

/// Default listen port for the upload proxy binary.
pub const UPLOAD_PROXY_PORT: u16 = 3001;

/// Resolve the local data directory used by the file-backed credential
/// store. Honors `RENTVAULT_DATA_DIR`, then falls back to the platform
/// data directory.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RENTVAULT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rentvault")
}

/// Return the current Unix timestamp in seconds.
///
/// This is a convenience wrapper that avoids the boilerplate of
/// `SystemTimeProvider::new().now_unix()` in production code paths.
/// For testable code, prefer accepting a `TimeProvider` parameter instead.
pub fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
