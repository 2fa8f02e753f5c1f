//! Policy-gated encryption and decryption through the remote threshold
//! network.
//!
//! Encryption is cheap to authorize (a self-consistent signature);
//! decryption is the guarded path: the network executes the entitlement
//! script against the ledger before releasing key shares. The client
//! owns the session lifecycle around both calls, including the one
//! automatic recovery in the pipeline: invalidate and retry once when
//! the network rejects a session attestation.

pub mod gateway;
pub mod policy;

pub use gateway::ThresholdGateway;
pub use policy::{AccessControlConditions, ScriptParams, ENTITLEMENT_SCRIPT};

use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::codec;
use crate::config::{CONNECT_POLL_INTERVAL_MS, LEDGER_CHAIN};
use crate::error::{VaultError, VaultResult};
use crate::marketplace::EncryptedPayload;
use crate::session::SessionManager;
use crate::traits::{
    CredentialStore, DecryptRequest, EncryptRequest, RandomSource, ThresholdNetwork, TimeProvider,
};

/// Connection guard state: one in-flight attempt at a time, with
/// cooperative polling for everyone else.
#[derive(Debug, Default)]
struct ConnectState {
    connected: bool,
    in_flight: bool,
}

/// Client for the key-release network, generic over the network itself
/// and the session manager's dependencies.
pub struct KeyReleaseClient<N, S, T, R> {
    network: N,
    sessions: SessionManager<S, T, R>,
    state: Mutex<ConnectState>,
}

impl<N, S, T, R> KeyReleaseClient<N, S, T, R>
where
    N: ThresholdNetwork,
    S: CredentialStore,
    T: TimeProvider,
    R: RandomSource,
{
    pub fn new(network: N, sessions: SessionManager<S, T, R>) -> Self {
        Self {
            network,
            sessions,
            state: Mutex::new(ConnectState::default()),
        }
    }

    pub fn sessions(&self) -> &SessionManager<S, T, R> {
        &self.sessions
    }

    /// Establish the network connection, idempotently.
    ///
    /// Exactly one caller performs the attempt; concurrent callers poll
    /// at a fixed interval and observe that attempt's outcome instead of
    /// racing their own. Connection establishment is a rare
    /// once-per-process event, so the busy-poll wait is acceptable.
    pub async fn connect(&self) -> VaultResult<()> {
        let owner = {
            let mut state = self.state.lock();
            if state.connected {
                return Ok(());
            }
            if state.in_flight {
                false
            } else {
                state.in_flight = true;
                true
            }
        };

        if !owner {
            loop {
                tokio::time::sleep(Duration::from_millis(CONNECT_POLL_INTERVAL_MS)).await;
                let state = self.state.lock();
                if !state.in_flight {
                    return if state.connected {
                        Ok(())
                    } else {
                        Err(VaultError::KeyRelease(
                            "key-release connection attempt failed".into(),
                        ))
                    };
                }
            }
        }

        debug!("connecting to key-release network");
        let result = self.network.connect().await;

        let mut state = self.state.lock();
        state.in_flight = false;
        state.connected = result.is_ok();
        drop(state);

        result
    }

    /// Encrypt a payload under the trivial self-signature gate.
    ///
    /// May create a session when none is valid; never touches ledger
    /// state. The returned ciphertext is hex-normalized.
    pub async fn encrypt(&self, plaintext: &[u8]) -> VaultResult<EncryptedPayload> {
        self.connect().await?;
        let auth_sig = self.sessions.ensure_session()?;

        let request = EncryptRequest {
            access_control_conditions: AccessControlConditions::self_signed(),
            data_to_encrypt: codec::bytes_to_base64(plaintext),
            auth_sig,
            chain: LEDGER_CHAIN.to_string(),
        };

        let response = self.network.encrypt(&request).await?;

        Ok(EncryptedPayload::from_network(
            &response.ciphertext,
            response.data_to_encrypt_hash,
        ))
    }

    /// Decrypt with the remote entitlement check.
    ///
    /// One automatic recovery: when the network rejects the attestation,
    /// the local session is invalidated and the whole call retried once
    /// with a fresh session. The loop is explicitly bounded, so a second
    /// rejection surfaces instead of looping. Every other failure
    /// (including a legitimate entitlement denial) surfaces immediately.
    pub async fn decrypt(
        &self,
        ciphertext: &str,
        key_derivation_hash: &str,
        listing_id: &str,
        package_id: &str,
        requester_address: &str,
    ) -> VaultResult<Vec<u8>> {
        self.connect().await?;
        let ciphertext_hex = codec::base64_to_hex(ciphertext);

        let mut recovered = false;
        loop {
            let auth_sig = self.sessions.ensure_session()?;

            let request = DecryptRequest {
                access_control_conditions: AccessControlConditions::self_signed(),
                ciphertext: ciphertext_hex.clone(),
                data_to_encrypt_hash: key_derivation_hash.to_string(),
                code: ENTITLEMENT_SCRIPT.to_string(),
                js_params: ScriptParams {
                    user_address: requester_address.to_string(),
                    listing_id: listing_id.to_string(),
                    package_id: package_id.to_string(),
                },
                auth_sig,
                chain: LEDGER_CHAIN.to_string(),
            };

            match self.network.decrypt(&request).await {
                Ok(plaintext) => return Ok(plaintext),
                Err(e) if e.is_auth_invalid() && !recovered => {
                    warn!("session rejected by key-release network, retrying once: {e}");
                    self.sessions.invalidate()?;
                    recovered = true;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
