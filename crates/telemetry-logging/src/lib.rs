//! # Telemetry Logging
//!
//! Structured logging setup for the collector and tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use telemetry_logging::{init_logging, LoggingConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LoggingConfig::from_env())?;
//!     tracing::info!("collector started");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DT_SERVICE_NAME` | `signed-telemetry` | Service name attached to the startup event |
//! | `DT_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `DT_JSON_LOGS` | `false` (`true` in containers) | JSON output |

#![warn(missing_docs)]

mod config;
mod tracing_setup;

pub use config::LoggingConfig;
pub use tracing_setup::{build_filter, init_logging};

use thiserror::Error;

/// Logging initialization errors
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Filter directive did not parse
    #[error("Invalid log filter {directive:?}: {reason}")]
    InvalidFilter {
        /// Directive as configured
        directive: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}
