//! Time provider abstraction for testable time-dependent code.
//!
//! Session expiry and entitlement validity both compare against "now";
//! injecting the clock keeps those checks deterministic under test.

use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for providing the current Unix timestamp.
pub trait TimeProvider: Send + Sync {
    /// Returns the current Unix timestamp in seconds.
    fn now_unix(&self) -> u64;
}

/// Production implementation that uses the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl SystemTimeProvider {
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_in_a_plausible_range() {
        let now = SystemTimeProvider::new().now_unix();

        // After 2020, before 2100.
        assert!(now > 1_577_836_800);
        assert!(now < 4_102_444_800);
    }
}
