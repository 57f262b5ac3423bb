//! Custom error types for the application.
//!
//! Two layers of errors exist:
//!
//! - **`HarnessError`**: why a validation run stopped early. A failure while
//!   measuring with default settings is fatal and reported as
//!   `DefaultPhaseFailed`; any sensor error the harness did not provoke on
//!   purpose in a later phase becomes `UnexpectedSensorError`.
//! - **`AppError`**: everything the binary can fail on, from configuration
//!   loading to logging setup, wrapping `HarnessError` via `#[from]`.
//!
//! Device errors themselves are `colour_core::SensorError`.

use crate::harness::Phase;
use colour_core::SensorError;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Reasons a validation run stops before completing its phases.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// Reading with default settings failed; nothing else is run.
    #[error("default-settings measurement failed: {source}")]
    DefaultPhaseFailed {
        /// Error reported by the sensor
        source: SensorError,
    },

    /// A sensor operation failed where no error was expected.
    #[error("unexpected sensor error during {phase} phase: {source}")]
    UnexpectedSensorError {
        /// Phase that was running
        phase: Phase,
        /// Error reported by the sensor
        source: SensorError,
    },
}

impl HarnessError {
    /// Sensor error behind this failure.
    pub fn sensor_error(&self) -> &SensorError {
        match self {
            HarnessError::DefaultPhaseFailed { source }
            | HarnessError::UnexpectedSensorError { source, .. } => source,
        }
    }
}

/// Primary error type for the colour-check binary.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Configuration parsed but failed semantic validation.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// Logging could not be initialized.
    #[error("Logging setup error: {0}")]
    Logging(String),

    /// The validation run stopped early.
    #[error(transparent)]
    Harness(#[from] HarnessError),
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(Box::new(err))
    }
}
