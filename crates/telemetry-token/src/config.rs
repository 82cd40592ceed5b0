//! Verifier configuration with validation.
//!
//! Values come from defaults, a serde document, or the environment:
//!
//! - `DT_FRESHNESS_WINDOW_SECS`: freshness window (default: 30)
//! - `DT_MAX_TOKEN_LEN`: wire token length cap in bytes (default: 8192)

use crate::domain::codec::{TokenCodec, DEFAULT_MAX_TOKEN_LEN};
use crate::domain::freshness::{FreshnessPolicy, DEFAULT_FRESHNESS_WINDOW_SECS};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Largest accepted freshness window (one day).
pub const MAX_FRESHNESS_WINDOW_SECS: u64 = 86_400;

/// Smallest accepted token length cap. A minimal real token is longer.
pub const MIN_MAX_TOKEN_LEN: usize = 128;

/// Environment variable for the freshness window.
pub const ENV_FRESHNESS_WINDOW_SECS: &str = "DT_FRESHNESS_WINDOW_SECS";

/// Environment variable for the token length cap.
pub const ENV_MAX_TOKEN_LEN: &str = "DT_MAX_TOKEN_LEN";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but does not parse
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// Freshness window above the maximum
    #[error("Freshness window {0}s exceeds maximum of {max}s", max = MAX_FRESHNESS_WINDOW_SECS)]
    WindowTooLarge(u64),

    /// Token length cap below the minimum
    #[error("max_token_len {0} is below minimum of {min}", min = MIN_MAX_TOKEN_LEN)]
    MaxTokenLenTooSmall(usize),
}

/// Verifier configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Allowed `|now - issued_at|` in seconds
    pub freshness_window_secs: u64,
    /// Tokens longer than this are rejected before decoding
    pub max_token_len: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            max_token_len: DEFAULT_MAX_TOKEN_LEN,
        }
    }
}

impl VerifierConfig {
    /// Read configuration from the process environment and validate it.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup` and validate it. Unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FRESHNESS_WINDOW_SECS) {
            config.freshness_window_secs = parse_var(ENV_FRESHNESS_WINDOW_SECS, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_TOKEN_LEN) {
            config.max_token_len = parse_var(ENV_MAX_TOKEN_LEN, value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freshness_window_secs > MAX_FRESHNESS_WINDOW_SECS {
            return Err(ConfigError::WindowTooLarge(self.freshness_window_secs));
        }

        if self.max_token_len < MIN_MAX_TOKEN_LEN {
            return Err(ConfigError::MaxTokenLenTooSmall(self.max_token_len));
        }

        Ok(())
    }

    /// Freshness policy for this configuration.
    pub fn policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.freshness_window_secs)
    }

    /// Codec for this configuration.
    pub fn codec(&self) -> TokenCodec {
        TokenCodec::with_max_token_len(self.max_token_len)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}
