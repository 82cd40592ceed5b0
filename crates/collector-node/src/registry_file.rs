//! JSON registry file.
//!
//! ```json
//! { "devices": [ { "device_id": "dev-1", "public_key": "02ab..." } ] }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use telemetry_token::{InMemoryDeviceRegistry, RegistryEntry};

/// On-disk registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryFile {
    /// Provisioned devices
    #[serde(default)]
    pub devices: Vec<RegistryEntry>,
}

impl RegistryFile {
    /// Read and parse a registry file. Key material errors name the file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading registry {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing registry {}", path.display()))
    }

    /// Read a registry file, or start an empty one if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the registry as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .with_context(|| format!("writing registry {}", path.display()))
    }

    /// Insert or replace the entry for `entry.device_id`.
    pub fn upsert(&mut self, entry: RegistryEntry) {
        match self
            .devices
            .iter_mut()
            .find(|e| e.device_id == entry.device_id)
        {
            Some(existing) => *existing = entry,
            None => self.devices.push(entry),
        }
    }

    /// Build the in-memory registry the verifier reads from.
    pub fn into_registry(self) -> InMemoryDeviceRegistry {
        InMemoryDeviceRegistry::from_entries(self.devices)
    }
}
