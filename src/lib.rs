//! Client pipeline for a decentralized rental marketplace of
//! access-controlled encrypted content.
//!
//! Three independently failing external systems back the marketplace: a
//! threshold-cryptography network that releases decryption keys under a
//! ledger-checked policy, a replicated blob store reached through an
//! ordered failover fanout, and a public ledger holding listings and
//! entitlement passes. This crate chains them into two user-facing
//! operations, `publish` (encrypt, store, hand back anchors) and
//! `access` (fetch, download, decrypt under entitlement), and owns the
//! failure and retry policy across all three.

pub mod codec;
pub mod config;
pub mod error;
pub mod keyrelease;
pub mod ledger;
pub mod marketplace;
pub mod pipeline;
pub mod session;
pub mod storage;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use error::{StorageOp, VaultError, VaultResult};
pub use keyrelease::{KeyReleaseClient, ThresholdGateway};
pub use ledger::{JsonRpcLedger, LedgerGateway, TransactionSpec, TxArg};
pub use marketplace::{AccessPass, EncryptedPayload, Listing, PublishReceipt};
pub use pipeline::Pipeline;
pub use session::{FileStore, Session, SessionManager};
pub use storage::{HttpBlobNode, NodeFailure, StorageConfig, StorageFanout, StorePath};
pub use traits::{
    BlobNode, CredentialStore, LedgerObject, LedgerRpc, RandomSource, SystemTimeProvider,
    ThreadRng, ThresholdNetwork, TimeProvider,
};
