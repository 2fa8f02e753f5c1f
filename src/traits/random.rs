//! Random source abstraction for testable random number generation.
//!
//! The only randomness the pipeline itself consumes is the session
//! challenge nonce; keys are generated remotely by the key-release
//! network.

use rand::RngCore;

use crate::config::SESSION_NONCE_BYTES;

/// Trait for providing random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill the destination buffer with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);

    /// Generate a challenge nonce for a session statement.
    fn session_nonce(&self) -> [u8; SESSION_NONCE_BYTES] {
        let mut bytes = [0u8; SESSION_NONCE_BYTES];
        self.fill_bytes(&mut bytes);
        bytes
    }
}

/// Production implementation using the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRng;

impl RandomSource for ThreadRng {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rand::thread_rng().fill_bytes(dest);
    }
}

impl ThreadRng {
    pub const fn new() -> Self {
        Self
    }
}
