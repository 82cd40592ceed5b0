//! # Token Errors
//!
//! Error types for token encoding, issuing and verification.

use super::entities::RejectionReason;
use telemetry_crypto::CryptoError;
use thiserror::Error;

/// Errors raised while encoding, decoding or verifying a token.
///
/// Every variant except `InvalidKey` rejects a single token and maps onto a
/// [`RejectionReason`]. `InvalidKey` means the caller's own key handling is
/// broken and should be surfaced louder than a per-token rejection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Wire framing is wrong (delimiter count, empty segment, oversized)
    #[error("Malformed token: {0}")]
    MalformedToken(&'static str),

    /// A segment is not canonical base64url or canonical JSON
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(&'static str),

    /// Header declares an algorithm other than the pinned one
    #[error("Unsupported algorithm: {0:?}")]
    UnsupportedAlgorithm(String),

    /// `issued_at` is further than the freshness window from `now`
    #[error("Timestamp {issued_at} outside window of {window_secs}s around {now}")]
    StaleOrFutureTimestamp {
        /// Producer-supplied timestamp
        issued_at: u64,
        /// Verifier time at check
        now: u64,
        /// Allowed absolute skew
        window_secs: u64,
    },

    /// Device id has no registered public key
    #[error("Unknown device: {0:?}")]
    UnknownDevice(String),

    /// Signature does not verify against the registered key
    #[error("Signature verification failed")]
    InvalidSignature,

    /// Key material itself is malformed
    #[error("Invalid key material: {0}")]
    InvalidKey(#[from] CryptoError),
}

impl TokenError {
    /// Per-token rejection reason, or `None` for key material errors.
    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            TokenError::MalformedToken(_) => Some(RejectionReason::MalformedToken),
            TokenError::MalformedEncoding(_) => Some(RejectionReason::MalformedEncoding),
            TokenError::UnsupportedAlgorithm(_) => Some(RejectionReason::UnsupportedAlgorithm),
            TokenError::StaleOrFutureTimestamp { .. } => {
                Some(RejectionReason::StaleOrFutureTimestamp)
            }
            TokenError::UnknownDevice(_) => Some(RejectionReason::UnknownDevice),
            TokenError::InvalidSignature => Some(RejectionReason::InvalidSignature),
            TokenError::InvalidKey(_) => None,
        }
    }

    /// True for errors caused by broken key material rather than a bad token.
    pub fn is_key_error(&self) -> bool {
        matches!(self, TokenError::InvalidKey(_))
    }
}
