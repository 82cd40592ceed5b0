//! # Freshness Policy
//!
//! Replay defense by timestamp window. A claim is fresh when
//! `|now - issued_at| <= window_secs`; the absolute difference tolerates
//! clock skew in both directions.

use super::errors::TokenError;
use serde::{Deserialize, Serialize};

/// Default freshness window in seconds.
pub const DEFAULT_FRESHNESS_WINDOW_SECS: u64 = 30;

/// Maximum allowed distance between `issued_at` and the verifier clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessPolicy {
    /// Window in seconds, inclusive
    pub window_secs: u64,
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
        }
    }
}

impl FreshnessPolicy {
    /// Policy with the given window.
    pub fn new(window_secs: u64) -> Self {
        Self { window_secs }
    }

    /// Whether `issued_at` is within the window around `now`.
    pub fn is_fresh(&self, issued_at: u64, now: u64) -> bool {
        now.abs_diff(issued_at) <= self.window_secs
    }

    /// `Ok(())` when fresh, `StaleOrFutureTimestamp` otherwise.
    pub fn check(&self, issued_at: u64, now: u64) -> Result<(), TokenError> {
        if self.is_fresh(issued_at, now) {
            Ok(())
        } else {
            Err(TokenError::StaleOrFutureTimestamp {
                issued_at,
                now,
                window_secs: self.window_secs,
            })
        }
    }
}
