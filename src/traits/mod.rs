//! Trait abstractions for dependency injection and testability.
//!
//! Every external system the pipeline touches (blob storage nodes, the
//! key-release network, the ledger RPC, durable credential storage, time,
//! and randomness) sits behind a trait here, enabling unit testing
//! without network connections or a local wallet.

pub mod blob;
pub mod ledger;
pub mod random;
pub mod store;
pub mod threshold;
pub mod time;

// Re-export all traits for crate-internal use.
// The public API surface is controlled by lib.rs re-exports.
pub use blob::{BlobNode, NodeError, StoreReceipt};
pub use ledger::{LedgerObject, LedgerRpc};
pub use random::RandomSource;
pub use store::CredentialStore;
pub use threshold::{DecryptRequest, EncryptRequest, EncryptResponse, ThresholdNetwork};
pub use time::TimeProvider;

// Re-export default implementations
pub use random::ThreadRng;
pub use time::SystemTimeProvider;
