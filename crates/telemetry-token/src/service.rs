//! # Token Verification Service
//!
//! Application service implementing [`TokenVerificationApi`] on top of the
//! domain verifier. Batches are verified in parallel against a single `now`
//! so every token in a batch sees the same clock reading.

use crate::adapters::clock::SystemClock;
use crate::config::{ConfigError, VerifierConfig};
use crate::domain::entities::{BatchVerificationResult, VerificationResult};
use crate::domain::verifier::TokenVerifier;
use crate::ports::inbound::TokenVerificationApi;
use crate::ports::outbound::{Clock, DeviceRegistry};
use rayon::prelude::*;
use tracing::debug;

/// Token verification service.
pub struct TokenVerificationService<R: DeviceRegistry, C: Clock = SystemClock> {
    verifier: TokenVerifier<R, C>,
}

impl<R: DeviceRegistry> TokenVerificationService<R, SystemClock> {
    /// Service over `registry`, failing if `config` is out of bounds.
    pub fn new(registry: R, config: &VerifierConfig) -> Result<Self, ConfigError> {
        TokenVerifier::from_config(registry, config).map(Self::from_verifier)
    }
}

impl<R: DeviceRegistry, C: Clock> TokenVerificationService<R, C> {
    /// Wrap an existing verifier.
    pub fn from_verifier(verifier: TokenVerifier<R, C>) -> Self {
        Self { verifier }
    }

    /// Underlying verifier.
    pub fn verifier(&self) -> &TokenVerifier<R, C> {
        &self.verifier
    }

    /// Verify several tokens in parallel at an explicit `now`.
    pub fn verify_batch_at(&self, wires: &[String], now: u64) -> BatchVerificationResult {
        let results: Vec<VerificationResult> = wires
            .par_iter()
            .map(|wire| self.verifier.verify_at(wire, now))
            .collect();

        let batch = BatchVerificationResult::from_results(results);
        debug!(
            total = wires.len(),
            verified = batch.verified_count,
            rejected = batch.rejected_count,
            "Batch verified"
        );
        batch
    }
}

impl<R: DeviceRegistry, C: Clock> TokenVerificationApi for TokenVerificationService<R, C> {
    fn verify_token(&self, wire: &str) -> VerificationResult {
        self.verifier.verify(wire)
    }

    fn verify_token_at(&self, wire: &str, now: u64) -> VerificationResult {
        self.verifier.verify_at(wire, now)
    }

    fn verify_batch(&self, wires: &[String]) -> BatchVerificationResult {
        self.verify_batch_at(wires, self.verifier.now())
    }
}
