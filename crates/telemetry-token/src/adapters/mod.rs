//! # Adapters Layer
//!
//! In-process implementations of the outbound ports.

pub mod clock;
pub mod registry;

pub use clock::{current_timestamp, FixedClock, SystemClock};
pub use registry::InMemoryDeviceRegistry;
