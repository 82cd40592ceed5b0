//! # Domain Layer
//!
//! Token structures, canonical codec, signer and verifier.
//! No I/O: time and device keys come in through the outbound ports.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod freshness;
pub mod signer;
pub mod verifier;
