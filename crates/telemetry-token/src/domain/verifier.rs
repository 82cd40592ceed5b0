//! # Token Verifier
//!
//! Collector-side verification as an ordered sequence of checks:
//!
//! ```text
//! Received -> StructurallyParsed -> AlgorithmChecked -> FreshnessChecked
//!          -> KeyResolved -> SignatureChecked -> Verified
//!
//! any failing transition -> Rejected(reason)
//! ```
//!
//! The first failing check decides the rejection reason. Nothing expensive
//! (registry lookup, curve arithmetic) runs before the cheap structural and
//! policy checks have passed.

use super::codec::{DecodedToken, TokenCodec};
use super::entities::{Claims, RejectionReason, VerificationResult};
use super::errors::TokenError;
use super::freshness::FreshnessPolicy;
use crate::adapters::clock::SystemClock;
use crate::config::{ConfigError, VerifierConfig};
use crate::ports::outbound::{Clock, DeviceRegistry};
use tracing::{debug, error, info, warn};

/// Last stage a token reached before it was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationStage {
    /// Token string handed to the verifier
    Received,
    /// Framing and canonical encoding accepted
    StructurallyParsed,
    /// Header names the pinned algorithm
    AlgorithmChecked,
    /// `issued_at` within the window
    FreshnessChecked,
    /// Registry returned a key for the device
    KeyResolved,
}

impl VerificationStage {
    /// Rejection reported when the check following this stage fails.
    ///
    /// Every structural failure is `MalformedToken`, whichever codec error
    /// caused it.
    pub fn rejection_reason(self) -> RejectionReason {
        match self {
            VerificationStage::Received => RejectionReason::MalformedToken,
            VerificationStage::StructurallyParsed => RejectionReason::UnsupportedAlgorithm,
            VerificationStage::AlgorithmChecked => RejectionReason::StaleOrFutureTimestamp,
            VerificationStage::FreshnessChecked => RejectionReason::UnknownDevice,
            VerificationStage::KeyResolved => RejectionReason::InvalidSignature,
        }
    }
}

/// Verifies wire tokens against a device registry and a clock.
///
/// Stateless between calls: the registry is only read and nonces are not
/// remembered, so a single verifier can be shared across threads.
#[derive(Debug)]
pub struct TokenVerifier<R: DeviceRegistry, C: Clock = SystemClock> {
    codec: TokenCodec,
    policy: FreshnessPolicy,
    registry: R,
    clock: C,
}

impl<R: DeviceRegistry> TokenVerifier<R, SystemClock> {
    /// Verifier reading the wall clock.
    pub fn new(registry: R, policy: FreshnessPolicy) -> Self {
        Self::with_clock(registry, policy, SystemClock)
    }

    /// Verifier built from `config` after validating it.
    pub fn from_config(registry: R, config: &VerifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(registry, config.policy()).with_codec(config.codec()))
    }
}

impl<R: DeviceRegistry, C: Clock> TokenVerifier<R, C> {
    /// Verifier reading time from `clock`.
    pub fn with_clock(registry: R, policy: FreshnessPolicy, clock: C) -> Self {
        Self {
            codec: TokenCodec::default(),
            policy,
            registry,
            clock,
        }
    }

    /// Replace the codec, e.g. to change the maximum token length.
    pub fn with_codec(mut self, codec: TokenCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Freshness policy in force.
    pub fn policy(&self) -> FreshnessPolicy {
        self.policy
    }

    /// Codec used for structural parsing.
    pub fn codec(&self) -> TokenCodec {
        self.codec
    }

    /// Underlying registry.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Current time according to this verifier's clock.
    pub fn now(&self) -> u64 {
        self.clock.now_unix_secs()
    }

    /// Verify `wire` against the verifier's clock.
    pub fn verify(&self, wire: &str) -> VerificationResult {
        self.verify_at(wire, self.now())
    }

    /// Verify `wire` as if the current time were `now`.
    pub fn verify_at(&self, wire: &str, now: u64) -> VerificationResult {
        match self.check(wire, now) {
            Ok(claims) => {
                info!(
                    device_id = %claims.device_id,
                    issued_at = claims.issued_at,
                    "Token verified"
                );
                VerificationResult::Verified { claims }
            }
            Err((stage, err)) => {
                let reason = stage.rejection_reason();
                if err.is_key_error() {
                    error!(?stage, error = %err, "Key material error during verification");
                } else if reason == RejectionReason::InvalidSignature {
                    warn!(?stage, error = %err, "Token rejected");
                } else {
                    debug!(?stage, error = %err, "Token rejected");
                }
                VerificationResult::rejected(reason)
            }
        }
    }

    /// Run every check, returning the last stage reached on failure.
    fn check(&self, wire: &str, now: u64) -> Result<Claims, (VerificationStage, TokenError)> {
        let DecodedToken {
            header,
            claims,
            signature,
            signing_input,
        } = self
            .codec
            .decode_token(wire)
            .map_err(|e| (VerificationStage::Received, e))?;

        if !header.is_supported() {
            return Err((
                VerificationStage::StructurallyParsed,
                TokenError::UnsupportedAlgorithm(header.algorithm_id),
            ));
        }

        self.policy
            .check(claims.issued_at, now)
            .map_err(|e| (VerificationStage::AlgorithmChecked, e))?;

        let Some(public_key) = self.registry.lookup(&claims.device_id) else {
            return Err((
                VerificationStage::FreshnessChecked,
                TokenError::UnknownDevice(claims.device_id),
            ));
        };

        if !public_key.verify(signing_input.as_bytes(), &signature) {
            return Err((VerificationStage::KeyResolved, TokenError::InvalidSignature));
        }

        Ok(claims)
    }
}
