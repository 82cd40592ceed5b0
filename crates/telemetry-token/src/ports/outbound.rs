//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the verifier depends on but does not own.

use std::sync::Arc;
use telemetry_crypto::DevicePublicKey;

/// Lookup of a device's registered public key.
///
/// Population, persistence and revocation belong to provisioning. The
/// verifier only reads, possibly from many threads at once, so
/// implementations must be safe for concurrent readers.
pub trait DeviceRegistry: Send + Sync {
    /// Returns the registered key, or `None` if the device is unknown.
    fn lookup(&self, device_id: &str) -> Option<DevicePublicKey>;
}

impl<R: DeviceRegistry + ?Sized> DeviceRegistry for Arc<R> {
    fn lookup(&self, device_id: &str) -> Option<DevicePublicKey> {
        (**self).lookup(device_id)
    }
}

/// Source of the verifier's current time.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn now_unix_secs(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_unix_secs(&self) -> u64 {
        (**self).now_unix_secs()
    }
}
