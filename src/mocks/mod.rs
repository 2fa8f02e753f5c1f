//! Mock implementations for testing.
//!
//! This module provides mock implementations of the trait abstractions
//! that allow unit testing without storage nodes, a key-release network,
//! a ledger endpoint, or a real filesystem.

pub mod blob;
pub mod ledger;
pub mod random;
pub mod store;
pub mod threshold;
pub mod time;

pub use blob::{BlobFailure, MockBlobNode, SharedBlobStore};
pub use ledger::MockLedgerRpc;
pub use random::MockRandom;
pub use store::MemoryStore;
pub use threshold::MockThresholdNetwork;
pub use time::MockTime;
