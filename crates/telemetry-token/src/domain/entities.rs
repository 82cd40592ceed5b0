//! # Domain Entities
//!
//! Token structures and verification outcomes.
//!
//! Field order in `Header` and `Claims` is part of the canonical encoding.
//! Reordering fields changes the signed bytes and breaks every deployed
//! device.

use serde::{Deserialize, Serialize};
use std::fmt;
use telemetry_crypto::{DevicePublicKey, TokenSignature, ALGORITHM_ID};

// =============================================================================
// Token Types
// =============================================================================

/// Token header. Carries only the algorithm identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Header {
    /// Must equal [`ALGORITHM_ID`]
    #[serde(rename = "alg")]
    pub algorithm_id: String,
}

impl Header {
    /// Header declaring the single supported algorithm.
    pub fn pinned() -> Self {
        Self {
            algorithm_id: ALGORITHM_ID.to_string(),
        }
    }

    /// Header declaring an arbitrary algorithm.
    pub fn with_algorithm(algorithm_id: impl Into<String>) -> Self {
        Self {
            algorithm_id: algorithm_id.into(),
        }
    }

    /// Whether this header names the pinned algorithm.
    pub fn is_supported(&self) -> bool {
        self.algorithm_id == ALGORITHM_ID
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::pinned()
    }
}

/// Claims asserted by a device.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Application payload, opaque to this crate
    pub message: String,
    /// Registered device identifier
    pub device_id: String,
    /// Caller-chosen, should be unique per device within the freshness window
    pub nonce: String,
    /// Unix seconds, untrusted until checked against the freshness window
    pub issued_at: u64,
}

impl Claims {
    /// Build claims from parts.
    pub fn new(
        message: impl Into<String>,
        device_id: impl Into<String>,
        nonce: impl Into<String>,
        issued_at: u64,
    ) -> Self {
        Self {
            message: message.into(),
            device_id: device_id.into(),
            nonce: nonce.into(),
            issued_at,
        }
    }
}

/// A signed token: header, claims and the signature over their encodings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token header
    pub header: Header,
    /// Device claims
    pub claims: Claims,
    /// Signature over `b64(header) "." b64(claims)`
    pub signature: TokenSignature,
}

// =============================================================================
// Registry Types
// =============================================================================

/// One provisioned device and its public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Device identifier, unique in a registry
    pub device_id: String,
    /// Hex-encoded SEC1 public key on the wire
    pub public_key: DevicePublicKey,
}

// =============================================================================
// Verification Result Types
// =============================================================================

/// Why a token was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// Token could not be split and decoded
    MalformedToken,
    /// A segment is not canonically encoded. The verifier reports these as
    /// `MalformedToken`; codec callers see this one.
    MalformedEncoding,
    /// Header algorithm is not the pinned one
    UnsupportedAlgorithm,
    /// Timestamp outside the freshness window
    StaleOrFutureTimestamp,
    /// Device is not registered
    UnknownDevice,
    /// Signature does not verify
    InvalidSignature,
}

impl RejectionReason {
    /// Stable identifier for logs and transport responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::MalformedToken => "malformed_token",
            RejectionReason::MalformedEncoding => "malformed_encoding",
            RejectionReason::UnsupportedAlgorithm => "unsupported_algorithm",
            RejectionReason::StaleOrFutureTimestamp => "stale_or_future_timestamp",
            RejectionReason::UnknownDevice => "unknown_device",
            RejectionReason::InvalidSignature => "invalid_signature",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of verifying one token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationResult {
    /// All checks passed
    Verified {
        /// Authenticated claims
        claims: Claims,
    },
    /// The first failing check
    Rejected {
        /// Rejection reason
        reason: RejectionReason,
    },
}

impl VerificationResult {
    /// Create a rejected result.
    pub fn rejected(reason: RejectionReason) -> Self {
        VerificationResult::Rejected { reason }
    }

    /// Returns true if the token was verified.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationResult::Verified { .. })
    }

    /// Verified claims, if any.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            VerificationResult::Verified { claims } => Some(claims),
            VerificationResult::Rejected { .. } => None,
        }
    }

    /// Rejection reason, if any.
    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            VerificationResult::Verified { .. } => None,
            VerificationResult::Rejected { reason } => Some(*reason),
        }
    }

    /// Convert into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<Claims, RejectionReason> {
        match self {
            VerificationResult::Verified { claims } => Ok(claims),
            VerificationResult::Rejected { reason } => Err(reason),
        }
    }
}

/// Results of verifying several tokens against one `now`.
#[derive(Clone, Debug, Serialize)]
pub struct BatchVerificationResult {
    /// Individual results, in input order
    pub results: Vec<VerificationResult>,
    /// Count of verified tokens
    pub verified_count: usize,
    /// Count of rejected tokens
    pub rejected_count: usize,
}

impl BatchVerificationResult {
    /// Create a batch result from individual results.
    pub fn from_results(results: Vec<VerificationResult>) -> Self {
        let verified_count = results.iter().filter(|r| r.is_verified()).count();
        let rejected_count = results.len() - verified_count;

        Self {
            results,
            verified_count,
            rejected_count,
        }
    }

    /// Whether every token verified.
    pub fn all_verified(&self) -> bool {
        self.rejected_count == 0
    }
}
