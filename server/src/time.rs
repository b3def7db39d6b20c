//! Time source abstraction for token issuance and expiry.
//!
//! Production code uses the system clock; tests substitute a clock they can
//! advance explicitly so expiry and refresh windows are deterministic.

use std::time::{SystemTime, UNIX_EPOCH};

/// Abstraction over the wall clock.
pub trait TimeSource: Send + Sync {
    /// Get the current time in seconds since Unix epoch.
    fn now_secs(&self) -> u64;
}

/// Real time source using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_secs(&self) -> u64 {
        // Only a clock set before 1970 fails here; treat it as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs())
    }
}
