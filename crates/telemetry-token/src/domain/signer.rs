//! # Token Signer
//!
//! Produces signed tokens on the device side. Pure computation: the caller
//! supplies `issued_at` and `nonce`, nothing is read from the clock or
//! incremented behind the caller's back.

use super::codec::{signing_input, TokenCodec};
use super::entities::{Claims, Header, Token};
use super::errors::TokenError;
use telemetry_crypto::{DeviceKeyPair, DevicePublicKey};

/// Sign `header` and `claims` with the device's private key.
///
/// The signature covers exactly `b64(header) "." b64(claims)` as produced by
/// the canonical codec. The header is signed as given; pinning is the
/// verifier's job.
pub fn issue(key_pair: &DeviceKeyPair, header: &Header, claims: &Claims) -> Result<Token, TokenError> {
    let (header_segment, claims_segment) = TokenCodec::default().encode_segments(header, claims)?;
    let input = signing_input(&header_segment, &claims_segment);

    let signature = telemetry_crypto::sign(key_pair, input.as_bytes());

    Ok(Token {
        header: header.clone(),
        claims: claims.clone(),
        signature,
    })
}

/// A device-side signer bound to one key pair and the pinned header.
#[derive(Debug)]
pub struct TokenSigner {
    key_pair: DeviceKeyPair,
    header: Header,
}

impl TokenSigner {
    /// Create a signer for the device's key pair.
    pub fn new(key_pair: DeviceKeyPair) -> Self {
        Self {
            key_pair,
            header: Header::pinned(),
        }
    }

    /// Public half to hand to provisioning.
    pub fn public_key(&self) -> DevicePublicKey {
        self.key_pair.public_key()
    }

    /// Sign claims under the pinned header.
    pub fn issue(&self, claims: &Claims) -> Result<Token, TokenError> {
        issue(&self.key_pair, &self.header, claims)
    }

    /// Sign claims and return the wire string.
    pub fn issue_wire(&self, claims: &Claims) -> Result<String, TokenError> {
        self.issue(claims)?.to_wire()
    }
}
