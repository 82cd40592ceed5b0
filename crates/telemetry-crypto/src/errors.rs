//! Crypto error types.

use thiserror::Error;

/// Key material errors.
///
/// These indicate broken key handling (bad provisioning data, corrupted key
/// files), not a bad token, and are never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key bytes do not describe a valid secp256k1 key
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key has the wrong byte length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Signature has the wrong byte length
    #[error("Invalid signature length: expected {expected}, got {actual}")]
    InvalidSignatureLength {
        /// Expected signature length in bytes
        expected: usize,
        /// Actual signature length in bytes
        actual: usize,
    },

    /// Hex input could not be decoded
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),
}
