//! # Inbound Ports (Driving Ports / API)
//!
//! What a transport collaborator calls with tokens it received.

use crate::domain::entities::{BatchVerificationResult, VerificationResult};

/// Token verification API.
///
/// Implementations must be thread-safe (`Send + Sync`) and keep no state
/// between calls beyond what the registry owns.
pub trait TokenVerificationApi: Send + Sync {
    /// Verify one wire token against the current clock.
    fn verify_token(&self, wire: &str) -> VerificationResult;

    /// Verify one wire token at an explicit `now`.
    fn verify_token_at(&self, wire: &str, now: u64) -> VerificationResult;

    /// Verify several tokens in parallel against a single `now`.
    fn verify_batch(&self, wires: &[String]) -> BatchVerificationResult;
}
