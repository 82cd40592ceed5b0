//! Fuzz target for canonical header and claims decoding.
//!
//! Anything that decodes must re-encode to exactly the input bytes.
//!
//! ## Running
//!
//! ```bash
//! cd crates/telemetry-token
//! cargo +nightly fuzz run fuzz_canonical_decode
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use telemetry_token::TokenCodec;

fuzz_target!(|data: &[u8]| {
    let codec = TokenCodec::default();

    if let Ok(claims) = codec.decode_claims(data) {
        assert_eq!(codec.encode_claims(&claims).unwrap(), data);
    }

    if let Ok(header) = codec.decode_header(data) {
        assert_eq!(codec.encode_header(&header).unwrap(), data);
    }
});
