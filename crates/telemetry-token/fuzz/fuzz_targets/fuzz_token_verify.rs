//! Fuzz target for wire token verification.
//!
//! Arbitrary strings must never panic the verifier and must never verify,
//! since the fuzzer cannot produce a signature for the registered key.
//!
//! ## Running
//!
//! ```bash
//! cd crates/telemetry-token
//! cargo +nightly fuzz run fuzz_token_verify
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use telemetry_crypto::DeviceKeyPair;
use telemetry_token::{FreshnessPolicy, InMemoryDeviceRegistry, TokenVerifier};

/// Fuzz input for token verification.
#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzInput {
    /// Candidate wire token
    wire: String,
    /// Verifier time
    now: u64,
}

fuzz_target!(|input: FuzzInput| {
    let registry = InMemoryDeviceRegistry::new();
    registry.register("dev-1", DeviceKeyPair::from_bytes(&[7u8; 32]).unwrap().public_key());
    let verifier = TokenVerifier::new(registry, FreshnessPolicy::new(u64::MAX));

    let result = verifier.verify_at(&input.wire, input.now);

    // Deterministic
    assert_eq!(result, verifier.verify_at(&input.wire, input.now));
    assert!(!result.is_verified());
});
