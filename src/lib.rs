//! # colour-check
//!
//! Validation harness for the gain and integration-cycle settings of an RGBC
//! colour sensor (TCS3472x class, as found on Raspberry Pi sensor boards).
//!
//! ## Crate Structure
//!
//! - **`harness`**: the [`Harness`](harness::Harness), its phases and the
//!   [`RunReport`](harness::RunReport) of a run.
//! - **`config`**: layered [`Settings`](config::Settings) (defaults, TOML file,
//!   environment) describing the test plan and the simulated sensor.
//! - **`logging`**: `tracing` subscriber setup.
//! - **`error`**: [`HarnessError`](error::HarnessError) and the binary's
//!   [`AppError`](error::AppError).
//!
//! The sensor contract lives in the `colour-core` crate and the simulated
//! sensor in `colour-driver-mock`.

pub mod config;
pub mod error;
pub mod harness;
pub mod logging;

pub use colour_core::{ColourSensor, SensorError};
