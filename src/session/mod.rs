//! Local signing identity and time-boxed session attestations.
//!
//! The identity (an ed25519 keypair in durable local storage) is stable
//! across runs; only the session, a signed, time-boxed challenge
//! statement presented to the key-release network, expires. Sessions are
//! never refreshed early: one valid session exists at a time and is
//! reused until expiry or explicit invalidation.

pub mod file_store;

pub use file_store::FileStore;

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec;
use crate::config::{
    IDENTITY_STORE_KEY, SESSION_AUTH_STATEMENT, SESSION_PROTOCOL_VERSION, SESSION_STORE_KEY,
    SESSION_TTL_SECS,
};
use crate::error::{VaultError, VaultResult};
use crate::traits::{CredentialStore, RandomSource, TimeProvider};

/// A signed, time-boxed authorization statement.
///
/// Valid iff `now < expiry` and the triple (signature, address,
/// signed_message) is internally consistent: the signature verifies over
/// the statement against the key the address encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Hex ed25519 signature over `signed_message`.
    pub signature: String,

    /// `0x`-prefixed hex of the signer's public key.
    pub address: String,

    /// Unix timestamp (seconds) after which the session is dead.
    pub expiry: u64,

    /// The exact challenge text that was signed.
    pub signed_message: String,
}

impl Session {
    /// Verify the signature against the statement and the address.
    ///
    /// Guards against a tampered credential store; a session failing this
    /// check is treated like an expired one and re-created.
    pub fn is_consistent(&self) -> bool {
        let addr_hex = self.address.strip_prefix("0x").unwrap_or(&self.address);
        let Ok(key_bytes) = codec::hex_to_bytes(addr_hex) else {
            return false;
        };
        let Ok(key_bytes) = <[u8; 32]>::try_from(key_bytes.as_slice()) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };
        let Ok(sig_bytes) = codec::hex_to_bytes(&self.signature) else {
            return false;
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(sig_bytes.as_slice()) else {
            return false;
        };
        let signature = Signature::from_bytes(&sig_bytes);
        verifying_key
            .verify_strict(self.signed_message.as_bytes(), &signature)
            .is_ok()
    }
}

/// Manages the signing identity and the current session against durable
/// local storage.
pub struct SessionManager<S, T, R> {
    store: S,
    time: T,
    random: R,
    /// Origin string embedded in the challenge statement.
    origin: String,
    /// Cached signing key so the store is hit once per process.
    identity: Mutex<Option<SigningKey>>,
}

impl<S, T, R> SessionManager<S, T, R>
where
    S: CredentialStore,
    T: TimeProvider,
    R: RandomSource,
{
    pub fn new(store: S, time: T, random: R, origin: impl Into<String>) -> Self {
        Self {
            store,
            time,
            random,
            origin: origin.into(),
            identity: Mutex::new(None),
        }
    }

    /// Load the persisted signing key, generating and persisting a fresh
    /// one on first use. The identity never expires.
    pub fn signing_identity(&self) -> VaultResult<SigningKey> {
        let mut cached = self.identity.lock();
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        let key = match self.store.get(IDENTITY_STORE_KEY)? {
            Some(stored) => {
                let bytes = codec::hex_to_bytes(&stored)
                    .map_err(|_| VaultError::Store("stored signing key is not hex".into()))?;
                let bytes = <[u8; 32]>::try_from(bytes.as_slice()).map_err(|_| {
                    VaultError::Store("stored signing key has the wrong length".into())
                })?;
                SigningKey::from_bytes(&bytes)
            }
            None => {
                let mut seed = [0u8; 32];
                self.random.fill_bytes(&mut seed);
                let key = SigningKey::from_bytes(&seed);
                self.store
                    .put(IDENTITY_STORE_KEY, &codec::bytes_to_hex(&seed))?;
                info!("generated new signing identity");
                key
            }
        };

        *cached = Some(key.clone());
        Ok(key)
    }

    /// `0x`-prefixed hex of the signer's public key.
    pub fn address(&self) -> VaultResult<String> {
        let key = self.signing_identity()?;
        Ok(format!(
            "0x{}",
            codec::bytes_to_hex(key.verifying_key().as_bytes())
        ))
    }

    /// Return the persisted session when it is still valid, otherwise
    /// sign and persist a new one. Never refreshes early.
    pub fn ensure_session(&self) -> VaultResult<Session> {
        if let Some(raw) = self.store.get(SESSION_STORE_KEY)? {
            match serde_json::from_str::<Session>(&raw) {
                Ok(session) => {
                    if self.time.now_unix() < session.expiry && session.is_consistent() {
                        debug!(expiry = session.expiry, "reusing persisted session");
                        return Ok(session);
                    }
                }
                Err(e) => warn!("discarding unreadable persisted session: {e}"),
            }
        }
        self.create_session()
    }

    /// Remove the persisted session (not the identity). Idempotent.
    pub fn invalidate(&self) -> VaultResult<()> {
        self.store.remove(SESSION_STORE_KEY)?;
        info!("session invalidated");
        Ok(())
    }

    fn create_session(&self) -> VaultResult<Session> {
        let key = self.signing_identity()?;
        let address = self.address()?;
        let now = self.time.now_unix();
        let expiry = now + SESSION_TTL_SECS;
        let nonce = codec::bytes_to_hex(&self.random.session_nonce());

        let signed_message = format!(
            "{address} {SESSION_AUTH_STATEMENT}\n\n\
             URI: {origin}\n\
             Version: {SESSION_PROTOCOL_VERSION}\n\
             Nonce: {nonce}\n\
             Issued At: {now}\n\
             Expiration Time: {expiry}",
            origin = self.origin,
        );

        let signature = key.sign(signed_message.as_bytes());
        let session = Session {
            signature: codec::bytes_to_hex(&signature.to_bytes()),
            address,
            expiry,
            signed_message,
        };

        let raw = serde_json::to_string(&session)
            .map_err(|e| VaultError::Serialization(format!("session encoding failed: {e}")))?;
        self.store.put(SESSION_STORE_KEY, &raw)?;
        info!(expiry, "created new session");

        Ok(session)
    }
}
