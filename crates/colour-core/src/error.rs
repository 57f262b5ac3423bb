//! Error types reported by colour sensors.
//!
//! `SensorError` separates the two *configuration* errors a harness is expected
//! to provoke on purpose (`InvalidGain`, `InvalidIntegrationCycles`) from the
//! operational failures a real or simulated device can produce at any time.
//!
//! ## Error Hierarchy
//!
//! - **`InvalidGain`** / **`InvalidIntegrationCycles`**: a setter was handed a
//!   value outside the device's accepted set. The device state is left as it
//!   was before the call.
//! - **`Disabled`**: a reading was requested while the sensor is powered down.
//! - **`Communication`**, **`Hardware`**, **`Timeout`**: bus or device faults.
//! - **`NotSupported`**: the device does not implement an optional operation.

use thiserror::Error;

/// Convenience alias for results returned by sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;

/// Errors produced by [`ColourSensor`](crate::ColourSensor) implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// Gain not in `{1, 4, 16, 60}`.
    #[error("invalid gain {value}: must be one of 1, 4, 16, 60")]
    InvalidGain {
        /// The rejected gain value.
        value: u32,
    },

    /// Integration cycle count outside `1..=256`.
    #[error("invalid integration cycles {value}: must be between 1 and 256")]
    InvalidIntegrationCycles {
        /// The rejected cycle count.
        value: u32,
    },

    /// The sensor is disabled and cannot produce readings.
    #[error("colour sensor is disabled")]
    Disabled,

    /// Bus-level communication failure.
    #[error("communication error: {0}")]
    Communication(String),

    /// The device reported a fault.
    #[error("hardware error: {0}")]
    Hardware(String),

    /// The device did not answer in time.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The operation is not implemented by this device.
    #[error("operation not supported: {0}")]
    NotSupported(&'static str),
}

impl SensorError {
    /// True for [`SensorError::InvalidGain`].
    pub fn is_invalid_gain(&self) -> bool {
        matches!(self, SensorError::InvalidGain { .. })
    }

    /// True for [`SensorError::InvalidIntegrationCycles`].
    pub fn is_invalid_integration_cycles(&self) -> bool {
        matches!(self, SensorError::InvalidIntegrationCycles { .. })
    }
}
