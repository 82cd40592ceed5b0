//! # Collector Node
//!
//! Command-line front end for signed telemetry.
//!
//! - `keygen` provisions a device: new key pair, public half written to the
//!   registry file
//! - `issue` plays the device: signs claims and prints the wire token
//! - `verify` plays the collector: reads wire tokens from stdin and prints one
//!   JSON `VerificationResult` per line
//!
//! The registry file and stdin stand in for the provisioning store and the
//! transport.

pub mod cli;
pub mod commands;
pub mod registry_file;
