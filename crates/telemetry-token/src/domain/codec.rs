//! # Token Codec
//!
//! Canonical encoding of headers and claims, and the three-part wire format.
//!
//! ## Wire Format
//!
//! ```text
//! base64url(header_json) "." base64url(claims_json) "." base64url(signature)
//! ```
//!
//! - JSON is compact with fixed field order, integers in plain base 10.
//! - base64url carries no padding. Its alphabet excludes `.`, so the
//!   delimiter cannot occur inside a segment.
//! - Decoding is strict: a segment must be byte-identical to the re-encoding
//!   of what it decodes to. Alternative spellings of the same value (extra
//!   whitespace, reordered fields, escaped ASCII, padding, stray trailing
//!   bits) are rejected.

use super::entities::{Claims, Header, Token};
use super::errors::TokenError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{de::DeserializeOwned, Serialize};
use telemetry_crypto::TokenSignature;

/// Segment delimiter.
pub const SEPARATOR: char = '.';

/// Default upper bound on wire token length in bytes.
pub const DEFAULT_MAX_TOKEN_LEN: usize = 8192;

// =============================================================================
// CANONICAL JSON
// =============================================================================

/// Structures with exactly one valid byte encoding.
pub trait CanonicalEncoding: Serialize + DeserializeOwned {
    /// Compact JSON in declaration field order.
    fn encode_canonical(&self) -> Result<Vec<u8>, TokenError> {
        serde_json::to_vec(self).map_err(|_| TokenError::MalformedEncoding("unserializable value"))
    }

    /// Inverse of `encode_canonical`; rejects any non-canonical input.
    fn decode_canonical(bytes: &[u8]) -> Result<Self, TokenError> {
        let value: Self = serde_json::from_slice(bytes)
            .map_err(|_| TokenError::MalformedEncoding("invalid JSON structure"))?;

        if value.encode_canonical()? != bytes {
            return Err(TokenError::MalformedEncoding("non-canonical JSON"));
        }

        Ok(value)
    }
}

impl CanonicalEncoding for Header {}
impl CanonicalEncoding for Claims {}

// =============================================================================
// SPLIT / SEGMENTS
// =============================================================================

/// The three encoded segments of a wire token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenParts<'a> {
    /// base64url header segment
    pub header: &'a str,
    /// base64url claims segment
    pub claims: &'a str,
    /// base64url signature segment
    pub signature: &'a str,
    /// `header "." claims`, the exact bytes the signature covers
    pub signing_input: &'a str,
}

/// A wire token after structural parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedToken<'a> {
    /// Decoded header
    pub header: Header,
    /// Decoded claims
    pub claims: Claims,
    /// Decoded signature
    pub signature: TokenSignature,
    /// Bytes the signature must cover
    pub signing_input: &'a str,
}

/// Encode bytes as an unpadded base64url segment.
pub fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode an unpadded base64url segment, rejecting non-canonical input.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::MalformedEncoding("invalid base64url segment"))?;

    if URL_SAFE_NO_PAD.encode(&bytes) != segment {
        return Err(TokenError::MalformedEncoding("non-canonical base64url segment"));
    }

    Ok(bytes)
}

/// Build the signing input from two encoded segments.
pub fn signing_input(header_segment: &str, claims_segment: &str) -> String {
    let mut input = String::with_capacity(header_segment.len() + 1 + claims_segment.len());
    input.push_str(header_segment);
    input.push(SEPARATOR);
    input.push_str(claims_segment);
    input
}

// =============================================================================
// TOKEN CODEC
// =============================================================================

/// Encoder/decoder for headers, claims and wire tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenCodec {
    max_token_len: usize,
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self {
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl TokenCodec {
    /// Create a codec with the default length cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with a custom length cap.
    pub fn with_max_token_len(max_token_len: usize) -> Self {
        Self { max_token_len }
    }

    /// Maximum accepted wire token length in bytes.
    pub fn max_token_len(&self) -> usize {
        self.max_token_len
    }

    /// Canonical bytes of a header.
    pub fn encode_header(&self, header: &Header) -> Result<Vec<u8>, TokenError> {
        header.encode_canonical()
    }

    /// Canonical bytes of claims.
    pub fn encode_claims(&self, claims: &Claims) -> Result<Vec<u8>, TokenError> {
        claims.encode_canonical()
    }

    /// Decode canonical header bytes.
    pub fn decode_header(&self, bytes: &[u8]) -> Result<Header, TokenError> {
        Header::decode_canonical(bytes)
    }

    /// Decode canonical claims bytes.
    pub fn decode_claims(&self, bytes: &[u8]) -> Result<Claims, TokenError> {
        Claims::decode_canonical(bytes)
    }

    /// Split a wire token into exactly three non-empty segments.
    pub fn split<'a>(&self, wire: &'a str) -> Result<TokenParts<'a>, TokenError> {
        if wire.len() > self.max_token_len {
            return Err(TokenError::MalformedToken("token exceeds maximum length"));
        }

        let mut segments = wire.split(SEPARATOR);
        let (Some(header), Some(claims), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::MalformedToken("expected exactly two delimiters"));
        };

        if header.is_empty() || claims.is_empty() || signature.is_empty() {
            return Err(TokenError::MalformedToken("empty segment"));
        }

        Ok(TokenParts {
            header,
            claims,
            signature,
            signing_input: &wire[..header.len() + 1 + claims.len()],
        })
    }

    /// Encode header and claims into their two base64url segments.
    pub fn encode_segments(
        &self,
        header: &Header,
        claims: &Claims,
    ) -> Result<(String, String), TokenError> {
        let header_segment = encode_segment(&self.encode_header(header)?);
        let claims_segment = encode_segment(&self.encode_claims(claims)?);
        Ok((header_segment, claims_segment))
    }

    /// Serialize a signed token to its wire form.
    pub fn encode_token(&self, token: &Token) -> Result<String, TokenError> {
        let (header_segment, claims_segment) = self.encode_segments(&token.header, &token.claims)?;
        let mut wire = signing_input(&header_segment, &claims_segment);
        wire.push(SEPARATOR);
        wire.push_str(&encode_segment(token.signature.as_bytes()));
        Ok(wire)
    }

    /// Structurally parse a wire token. Performs no cryptographic checks.
    pub fn decode_token<'a>(&self, wire: &'a str) -> Result<DecodedToken<'a>, TokenError> {
        let parts = self.split(wire)?;

        let header = self.decode_header(&decode_segment(parts.header)?)?;
        let claims = self.decode_claims(&decode_segment(parts.claims)?)?;
        let signature = TokenSignature::from_slice(&decode_segment(parts.signature)?)
            .map_err(|_| TokenError::MalformedEncoding("signature has wrong length"))?;

        Ok(DecodedToken {
            header,
            claims,
            signature,
            signing_input: parts.signing_input,
        })
    }
}

impl Token {
    /// Wire form of this token.
    pub fn to_wire(&self) -> Result<String, TokenError> {
        TokenCodec::default().encode_token(self)
    }
}
