//! Operational modes for the simulated sensor.
//!
//! - **Instant**: Zero delays, deterministic behavior for unit tests
//! - **Realistic**: Bus-like delays for integration runs
//! - **Chaos**: Configurable failures for resilience testing

use serde::{Deserialize, Serialize};

/// Operational modes for mock devices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MockMode {
    /// Zero delays, deterministic - for unit tests
    #[default]
    Instant,
    /// Bus-like timing - for integration runs
    Realistic,
    /// Random failures - for resilience testing
    Chaos,
}

impl MockMode {
    /// Whether operations should wait for simulated bus and settling delays.
    pub fn is_timed(self) -> bool {
        matches!(self, MockMode::Realistic | MockMode::Chaos)
    }
}
