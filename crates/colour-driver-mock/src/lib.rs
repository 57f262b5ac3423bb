//! Mock Colour Sensor Driver for colour-check
//!
//! This crate provides a simulated RGBC colour sensor so the validation harness
//! can run, and be tested, without a sensor board attached.
//! All delays use async-safe operations (tokio::time::sleep, not std::thread::sleep).
//!
//! # Available Mock Drivers
//!
//! - [`MockColourSensor`] - Simulated TCS3472x-style sensor with gain,
//!   integration cycles, saturation and seeded noise
//!
//! # Performance Characteristics
//!
//! - Instant mode: no delays
//! - Realistic / Chaos mode: 1ms per bus transaction, 3ms settling after a
//!   setting changes
//!
//! # Error Injection
//!
//! ```rust,ignore
//! use colour_driver_mock::{ErrorConfig, ErrorScenario, MockColourSensor};
//!
//! let sensor = MockColourSensor::builder()
//!     .error_config(ErrorConfig::scenario(ErrorScenario::HardwareFault { code: 7 }))
//!     .build();
//! ```

pub mod common;
mod mock_colour_sensor;

// Re-export common types
pub use common::{ErrorConfig, ErrorScenario, MockMode, MockRng, TimingConfig};

// Re-export driver types
pub use mock_colour_sensor::{
    MockColourSensor, MockColourSensorBuilder, MockColourSensorConfig, SceneColour,
};
