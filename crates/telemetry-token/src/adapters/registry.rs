//! In-memory device registry.
//!
//! Read-mostly map from device id to public key. Verifiers only call
//! [`DeviceRegistry::lookup`]; the mutating methods stand in for the
//! provisioning collaborator.

use crate::domain::entities::RegistryEntry;
use crate::domain::errors::TokenError;
use crate::ports::outbound::DeviceRegistry;
use parking_lot::RwLock;
use std::collections::HashMap;
use telemetry_crypto::DevicePublicKey;
use tracing::info;

/// Concurrent-read device registry held in memory.
#[derive(Debug, Default)]
pub struct InMemoryDeviceRegistry {
    devices: RwLock<HashMap<String, DevicePublicKey>>,
}

impl InMemoryDeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from provisioning entries. Later entries for the same
    /// device id replace earlier ones.
    pub fn from_entries(entries: impl IntoIterator<Item = RegistryEntry>) -> Self {
        let registry = Self::new();
        for entry in entries {
            registry.register_entry(entry);
        }
        registry
    }

    /// Register or replace a device's key. Returns the previous key, if any.
    pub fn register(
        &self,
        device_id: impl Into<String>,
        public_key: DevicePublicKey,
    ) -> Option<DevicePublicKey> {
        let device_id = device_id.into();
        info!(
            device_id = %device_id,
            fingerprint = %public_key.fingerprint(),
            "Device registered"
        );
        self.devices.write().insert(device_id, public_key)
    }

    /// Register a device from raw SEC1 key bytes.
    pub fn register_sec1(
        &self,
        device_id: impl Into<String>,
        sec1: &[u8],
    ) -> Result<Option<DevicePublicKey>, TokenError> {
        let public_key = DevicePublicKey::from_sec1_bytes(sec1)?;
        Ok(self.register(device_id, public_key))
    }

    /// Register a provisioning entry.
    pub fn register_entry(&self, entry: RegistryEntry) -> Option<DevicePublicKey> {
        self.register(entry.device_id, entry.public_key)
    }

    /// Remove a device. Its tokens are rejected as `UnknownDevice` afterwards.
    pub fn revoke(&self, device_id: &str) -> Option<DevicePublicKey> {
        let removed = self.devices.write().remove(device_id);
        if removed.is_some() {
            info!(device_id = %device_id, "Device revoked");
        }
        removed
    }

    /// Whether `device_id` is registered.
    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.read().contains_key(device_id)
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    /// Whether no devices are registered.
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Registered device ids, sorted.
    pub fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.devices.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of every entry, sorted by device id.
    pub fn entries(&self) -> Vec<RegistryEntry> {
        let mut entries: Vec<RegistryEntry> = self
            .devices
            .read()
            .iter()
            .map(|(device_id, public_key)| RegistryEntry {
                device_id: device_id.clone(),
                public_key: *public_key,
            })
            .collect();
        entries.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        entries
    }
}

impl DeviceRegistry for InMemoryDeviceRegistry {
    fn lookup(&self, device_id: &str) -> Option<DevicePublicKey> {
        self.devices.read().get(device_id).copied()
    }
}
