//! # ECDSA Device Keys (secp256k1)
//!
//! Key pairs and signatures used by devices to sign telemetry tokens.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - SHA-256 message digest, fixed 64-byte `r || s` signatures
//! - Low-S only: high-S signatures never verify (malleability)
//! - Constant-time scalar and key comparisons via `subtle`
//! - Secret scalars are zeroized on drop

use crate::CryptoError;
use k256::ecdsa::{
    signature::{Signer, Verifier},
    Signature, SigningKey, VerifyingKey,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

/// Algorithm identifier pinned in every token header.
pub const ALGORITHM_ID: &str = "ES256K";

/// Length of a secret scalar in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Length of a SEC1 compressed public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Length of an `r || s` signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Half of the secp256k1 curve order.
/// n/2 where n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

// =============================================================================
// PUBLIC KEY
// =============================================================================

/// A device's public verification key.
///
/// Exchanged and stored as the 33-byte SEC1 compressed point.
#[derive(Clone, Copy)]
pub struct DevicePublicKey {
    key: VerifyingKey,
}

impl DevicePublicKey {
    /// Parse a SEC1-encoded public key (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBLIC_KEY_LEN && bytes.len() != 65 {
            return Err(CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            });
        }
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| CryptoError::InvalidKey("not a point on secp256k1".into()))?;
        Ok(Self { key })
    }

    /// Parse a hex-encoded SEC1 public key.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        Self::from_sec1_bytes(&bytes)
    }

    /// Compressed SEC1 bytes.
    pub fn to_sec1_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        let sec1 = self.key.to_sec1_bytes();
        // SEC1 compressed encoding is always 33 bytes: 0x02/0x03 || x
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(&sec1[..PUBLIC_KEY_LEN]);
        bytes
    }

    /// Lowercase hex of the compressed key.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_sec1_bytes())
    }

    /// Short key identifier for logs: first 8 bytes of SHA-256 over the
    /// compressed key, hex-encoded.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.to_sec1_bytes());
        hex::encode(&digest[..8])
    }

    /// Verify a signature over `message`.
    ///
    /// Returns `false` for any signature that is not a valid low-S ECDSA
    /// signature by this key. Never panics.
    pub fn verify(&self, message: &[u8], signature: &TokenSignature) -> bool {
        let mut s = [0u8; 32];
        s.copy_from_slice(&signature.0[32..]);
        if !is_low_s(&s) {
            return false;
        }

        let sig = match Signature::from_slice(&signature.0) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        self.key.verify(message, &sig).is_ok()
    }
}

impl PartialEq for DevicePublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_sec1_bytes()[..]
            .ct_eq(&other.to_sec1_bytes()[..])
            .into()
    }
}

impl Eq for DevicePublicKey {}

impl fmt::Debug for DevicePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DevicePublicKey").field(&self.to_hex()).finish()
    }
}

impl Serialize for DevicePublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DevicePublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(de::Error::custom)
    }
}

// =============================================================================
// SIGNATURE
// =============================================================================

/// ECDSA signature (64 bytes, r||s format).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSignature([u8; SIGNATURE_LEN]);

impl TokenSignature {
    /// Create from bytes (64 bytes).
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SIGNATURE_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidSignatureLength {
                    expected: SIGNATURE_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl fmt::Debug for TokenSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenSignature({})", hex::encode(self.0))
    }
}

// =============================================================================
// KEY PAIR
// =============================================================================

/// A device's signing key pair. The secret half never leaves the device.
pub struct DeviceKeyPair {
    signing_key: SigningKey,
}

impl DeviceKeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret scalar bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SECRET_KEY_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            });
        }
        let signing_key = SigningKey::from_slice(bytes)
            .map_err(|_| CryptoError::InvalidKey("scalar out of range".into()))?;
        Ok(Self { signing_key })
    }

    /// Create from a hex-encoded secret scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = Zeroizing::new(
            hex::decode(hex_str.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }

    /// Public half, derived from the secret scalar.
    pub fn public_key(&self) -> DevicePublicKey {
        DevicePublicKey {
            key: *self.signing_key.verifying_key(),
        }
    }

    /// Sign a message (deterministic RFC 6979, low-S).
    pub fn sign(&self, message: &[u8]) -> TokenSignature {
        let sig: Signature = self.signing_key.sign(message);
        let sig = sig.normalize_s().unwrap_or(sig);
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes.copy_from_slice(&sig.to_bytes());
        TokenSignature(bytes)
    }

    /// Secret scalar bytes, wiped when the returned buffer is dropped.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; SECRET_KEY_LEN]> {
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LEN]);
        bytes.copy_from_slice(&self.signing_key.to_bytes());
        bytes
    }

    /// Hex of the secret scalar, wiped on drop.
    pub fn secret_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(&*self.secret_bytes()))
    }
}

impl fmt::Debug for DeviceKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceKeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// FREE FUNCTIONS
// =============================================================================

/// Sign `message` with the device's own private key.
pub fn sign(key_pair: &DeviceKeyPair, message: &[u8]) -> TokenSignature {
    key_pair.sign(message)
}

/// Verify `signature` over `message` against `public_key`.
pub fn verify(public_key: &DevicePublicKey, message: &[u8], signature: &TokenSignature) -> bool {
    public_key.verify(message, signature)
}

/// Check that S is at most `floor(n/2)`, the same bound `normalize_s` uses.
///
/// Runs in fixed time regardless of input: "less" and "greater" are both
/// accumulated over every byte without early return.
fn is_low_s(s: &[u8; 32]) -> bool {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for (s_byte, h_byte) in s.iter().zip(SECP256K1_HALF_ORDER.iter()) {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((s_byte < h_byte) as u8);
        let byte_greater = Choice::from((s_byte > h_byte) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    (!greater).into()
}
