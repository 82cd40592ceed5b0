//! # Telemetry Crypto - Device Key Material
//!
//! Asymmetric key pairs for devices that sign telemetry tokens, independent
//! of token framing.
//!
//! | Item | Purpose |
//! |------|---------|
//! | `DeviceKeyPair` | Secret scalar held by the device, signs payloads |
//! | `DevicePublicKey` | Shareable point registered with the collector |
//! | `TokenSignature` | Fixed-length 64-byte `r || s` signature |
//!
//! One scheme only: ECDSA over secp256k1 with SHA-256 (`ES256K`). There is no
//! algorithm negotiation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;

// Re-exports
pub use ecdsa::{
    sign, verify, DeviceKeyPair, DevicePublicKey, TokenSignature, ALGORITHM_ID, PUBLIC_KEY_LEN,
    SECRET_KEY_LEN, SIGNATURE_LEN,
};
pub use errors::CryptoError;
