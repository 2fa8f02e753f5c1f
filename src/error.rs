use crate::storage::NodeFailure;

/// Domain-specific error types for the rental marketplace pipeline.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Every configured storage node failed for one operation.
    /// Carries the per-node diagnostics in configured order.
    #[error("all {op} nodes failed ({} attempted)", .failures.len())]
    AllNodesFailed {
        op: StorageOp,
        failures: Vec<NodeFailure>,
    },

    /// The key-release network rejected the session attestation.
    /// Recoverable exactly once by regenerating the session.
    #[error("authentication rejected by key-release network: {0}")]
    AuthenticationInvalid(String),

    /// The verification script found no valid entitlement pass.
    /// Not retried; distinct from a credential problem.
    #[error("entitlement denied: {0}")]
    EntitlementDenied(String),

    /// Any other failure talking to the key-release network.
    #[error("key-release operation failed: {0}")]
    KeyRelease(String),

    /// Ledger RPC error or malformed object shape.
    #[error("ledger query failed: {0}")]
    LedgerQuery(String),

    /// Local precondition failed before any network call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Wire payload could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Durable local credential storage failed.
    #[error("credential store failed: {0}")]
    Store(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Which storage fanout operation exhausted its node list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Upload,
    Download,
}

impl std::fmt::Display for StorageOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Download => write!(f, "download"),
        }
    }
}

impl VaultError {
    /// True for the one error class the decrypt path recovers from
    /// by invalidating the local session and retrying once.
    pub const fn is_auth_invalid(&self) -> bool {
        matches!(self, Self::AuthenticationInvalid(_))
    }
}

/// Convenience type alias.
pub type VaultResult<T> = Result<T, VaultError>;
