//! # Signed Telemetry Tokens
//!
//! Devices sign telemetry claims with their secp256k1 key; the collector
//! verifies each token against a device registry and a freshness window.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Codec, signer and verifier, no I/O
//! - **Ports Layer** (`ports/`): Inbound verification API, outbound registry and clock
//! - **Adapters Layer** (`adapters/`): In-memory registry, system and fixed clocks
//! - **Service Layer** (`service.rs`): Wires the verifier to the inbound port
//!
//! ## Wire Format
//!
//! ```text
//! base64url(header) "." base64url(claims) "." base64url(signature)
//! ```
//!
//! Header and claims are compact JSON in a fixed field order. Decoding
//! re-encodes and rejects any input that is not byte-identical, so signer and
//! verifier always agree on the signed bytes.
//!
//! ## Security Notes
//!
//! - **Algorithm pinning**: only `ES256K` is accepted; there is no negotiation
//! - **Malleability**: high-S signatures are rejected
//! - **Replay**: bounded by the freshness window only; duplicates inside the
//!   window are accepted and must be filtered by the application if needed

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::{current_timestamp, FixedClock, InMemoryDeviceRegistry, SystemClock};
pub use config::{ConfigError, VerifierConfig};
pub use domain::codec::{
    decode_segment, encode_segment, signing_input, CanonicalEncoding, DecodedToken, TokenCodec,
    TokenParts, DEFAULT_MAX_TOKEN_LEN, SEPARATOR,
};
pub use domain::entities::{
    BatchVerificationResult, Claims, Header, RegistryEntry, RejectionReason, Token,
    VerificationResult,
};
pub use domain::errors::TokenError;
pub use domain::freshness::{FreshnessPolicy, DEFAULT_FRESHNESS_WINDOW_SECS};
pub use domain::signer::{issue, TokenSigner};
pub use domain::verifier::{TokenVerifier, VerificationStage};
pub use ports::inbound::TokenVerificationApi;
pub use ports::outbound::{Clock, DeviceRegistry};
pub use service::TokenVerificationService;
