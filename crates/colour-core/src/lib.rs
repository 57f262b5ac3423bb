//! Core types and traits for colour-check
//!
//! This crate holds everything a colour sensor implementation and the
//! validation harness need to agree on:
//!
//! - **`capabilities`**: the async [`ColourSensor`] trait.
//! - **`settings`**: validated [`Gain`] and [`IntegrationCycles`] values.
//! - **`reading`**: the [`RgbcReading`] sample type and its 0-256 scaling.
//! - **`error`**: [`SensorError`], including the two configuration errors the
//!   harness provokes on purpose.

pub mod capabilities;
pub mod error;
pub mod reading;
pub mod settings;

pub use capabilities::ColourSensor;
pub use error::{Result, SensorError};
pub use reading::{RgbcReading, SCALED_MAX};
pub use settings::{Gain, IntegrationCycles};
