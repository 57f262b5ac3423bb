//! Mock RGBC colour sensor matching TCS3472x behaviors.
//!
//! Provides a simulation of the colour sensor found on Raspberry Pi sensor
//! boards with:
//! - Gain settings 1x / 4x / 16x / 60x
//! - Integration cycles 1..=256 (2.4 ms each)
//! - Channel counts proportional to scene irradiance, gain and cycles,
//!   saturating at the 16-bit register limit
//! - Seeded multiplicative noise
//! - Enable/disable (disabled sensors refuse to read)
//!
//! # Example
//!
//! ```rust,ignore
//! use colour_driver_mock::{MockColourSensor, SceneColour};
//!
//! let sensor = MockColourSensor::builder()
//!     .scene(SceneColour::new(40.0, 55.0, 30.0, 120.0))
//!     .noise(0.02)
//!     .rng_seed(7)
//!     .build();
//! sensor.set_gain(16).await?;
//! let reading = sensor.colour().await?;
//! ```

use crate::common::{ErrorConfig, MockMode, MockRng, TimingConfig};
use async_trait::async_trait;
use colour_core::{ColourSensor, Gain, IntegrationCycles, Result, RgbcReading, SensorError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// =============================================================================
// Configuration
// =============================================================================

/// Per-channel scene irradiance, in raw counts per integration cycle at 1x gain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneColour {
    /// Red channel irradiance
    pub red: f64,
    /// Green channel irradiance
    pub green: f64,
    /// Blue channel irradiance
    pub blue: f64,
    /// Clear channel irradiance
    pub clear: f64,
}

impl SceneColour {
    /// Create a scene from per-channel irradiance.
    pub const fn new(red: f64, green: f64, blue: f64, clear: f64) -> Self {
        Self {
            red,
            green,
            blue,
            clear,
        }
    }

    /// A scene that produces zero counts on every channel.
    pub const fn dark() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    fn channels(&self) -> [f64; 4] {
        [self.red, self.green, self.blue, self.clear]
    }
}

impl Default for SceneColour {
    /// Dim indoor white light
    fn default() -> Self {
        Self::new(40.0, 55.0, 30.0, 120.0)
    }
}

/// Configuration for MockColourSensor, usually deserialized from `[sensor]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockColourSensorConfig {
    /// Operational mode (default: instant)
    #[serde(default)]
    pub mode: MockMode,
    /// RNG seed; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Noise amplitude as a fraction of the signal (default: 0.01)
    #[serde(default = "default_noise")]
    pub noise: f64,
    /// Scene irradiance
    #[serde(default)]
    pub scene: SceneColour,
    /// Failure probability per operation, applied in chaos mode
    #[serde(default)]
    pub failure_rate: f64,
}

fn default_noise() -> f64 {
    0.01
}

impl Default for MockColourSensorConfig {
    fn default() -> Self {
        Self {
            mode: MockMode::default(),
            seed: None,
            noise: default_noise(),
            scene: SceneColour::default(),
            failure_rate: 0.0,
        }
    }
}

// =============================================================================
// MockColourSensor
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct SensorState {
    gain: Gain,
    cycles: IntegrationCycles,
    enabled: bool,
}

impl Default for SensorState {
    fn default() -> Self {
        Self {
            gain: Gain::default(),
            cycles: IntegrationCycles::default(),
            enabled: true,
        }
    }
}

/// Simulated RGBC colour sensor.
///
/// Starts enabled at 1x gain and one integration cycle, like the real device
/// after power-on. A rejected setter call never changes the stored settings.
#[derive(Debug)]
pub struct MockColourSensor {
    state: Mutex<SensorState>,
    scene: SceneColour,
    noise: f64,
    mode: MockMode,
    timing: TimingConfig,
    error_config: ErrorConfig,
    rng: MockRng,
}

impl MockColourSensor {
    /// Create a sensor viewing the default scene, with no noise or delays.
    pub fn new() -> Self {
        Self::builder().noise(0.0).build()
    }

    /// Create builder for advanced configuration
    pub fn builder() -> MockColourSensorBuilder {
        MockColourSensorBuilder::default()
    }

    /// Build a sensor from deserialized configuration.
    ///
    /// Chaos mode turns `failure_rate` into random failures on every operation.
    pub fn from_config(config: &MockColourSensorConfig) -> Self {
        let mut builder = Self::builder()
            .mode(config.mode)
            .scene(config.scene)
            .noise(config.noise);
        if let Some(seed) = config.seed {
            builder = builder.rng_seed(seed);
        }
        if config.mode == MockMode::Chaos {
            builder = builder.error_config(ErrorConfig::random_failures_seeded(
                config.failure_rate,
                failure_seed(config.seed),
            ));
        }
        builder.build()
    }

    /// Scene the sensor is looking at.
    pub fn scene(&self) -> SceneColour {
        self.scene
    }

    /// Operational mode.
    pub fn mode(&self) -> MockMode {
        self.mode
    }

    async fn transaction(&self, operation: &'static str) -> Result<()> {
        self.error_config.check_operation(operation)?;
        if self.mode.is_timed() {
            tokio::time::sleep(self.timing.communication()).await;
        }
        Ok(())
    }

    async fn settle(&self) {
        if self.mode.is_timed() {
            tokio::time::sleep(self.timing.settling()).await;
        }
    }

    fn simulate(&self, state: SensorState) -> RgbcReading {
        let max_raw = f64::from(state.cycles.max_raw());
        let exposure = f64::from(state.gain.multiplier()) * f64::from(state.cycles.get());
        let [red, green, blue, clear] = self.scene.channels().map(|irradiance| {
            let counts = irradiance * exposure * self.rng.noise_factor(self.noise);
            counts.round().clamp(0.0, max_raw) as u16
        });
        RgbcReading::new(red, green, blue, clear)
    }
}

/// Seed for the failure stream, kept apart from the noise stream.
fn failure_seed(seed: Option<u64>) -> Option<u64> {
    seed.map(|s| s.wrapping_add(1))
}

impl Default for MockColourSensor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ColourSensor for MockColourSensor {
    async fn colour_raw(&self) -> Result<RgbcReading> {
        self.transaction("colour_raw").await?;
        let state = *self.state.lock();
        if !state.enabled {
            return Err(SensorError::Disabled);
        }
        let reading = self.simulate(state);
        tracing::trace!(%reading, gain = %state.gain, cycles = %state.cycles, "MockColourSensor: raw reading");
        Ok(reading)
    }

    async fn gain(&self) -> Result<Gain> {
        self.transaction("gain").await?;
        Ok(self.state.lock().gain)
    }

    async fn set_gain(&self, gain: u32) -> Result<()> {
        self.transaction("set_gain").await?;
        let gain = Gain::try_from(gain)?;
        self.state.lock().gain = gain;
        tracing::debug!(%gain, "MockColourSensor: gain set");
        self.settle().await;
        Ok(())
    }

    async fn integration_cycles(&self) -> Result<IntegrationCycles> {
        self.transaction("integration_cycles").await?;
        Ok(self.state.lock().cycles)
    }

    async fn set_integration_cycles(&self, cycles: u32) -> Result<()> {
        self.transaction("set_integration_cycles").await?;
        let cycles = IntegrationCycles::new(cycles)?;
        self.state.lock().cycles = cycles;
        tracing::debug!(%cycles, "MockColourSensor: integration cycles set");
        self.settle().await;
        Ok(())
    }

    async fn enabled(&self) -> Result<bool> {
        self.transaction("enabled").await?;
        Ok(self.state.lock().enabled)
    }

    async fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.transaction("set_enabled").await?;
        self.state.lock().enabled = enabled;
        tracing::debug!(enabled, "MockColourSensor: power state changed");
        Ok(())
    }
}

// =============================================================================
// Builder Pattern
// =============================================================================

/// Builder for MockColourSensor with advanced configuration
#[derive(Debug, Clone)]
pub struct MockColourSensorBuilder {
    scene: SceneColour,
    noise: f64,
    mode: MockMode,
    timing: TimingConfig,
    error_config: ErrorConfig,
    rng_seed: Option<u64>,
}

impl Default for MockColourSensorBuilder {
    fn default() -> Self {
        Self {
            scene: SceneColour::default(),
            noise: default_noise(),
            mode: MockMode::default(),
            timing: TimingConfig::colour_sensor(),
            error_config: ErrorConfig::none(),
            rng_seed: None,
        }
    }
}

impl MockColourSensorBuilder {
    /// Set scene irradiance
    pub fn scene(mut self, scene: SceneColour) -> Self {
        self.scene = scene;
        self
    }

    /// Set noise amplitude (fraction of signal, clamped to 0..=1)
    pub fn noise(mut self, noise: f64) -> Self {
        self.noise = noise.clamp(0.0, 1.0);
        self
    }

    /// Set operational mode
    pub fn mode(mut self, mode: MockMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set delays used outside instant mode
    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set error injection configuration
    pub fn error_config(mut self, config: ErrorConfig) -> Self {
        self.error_config = config;
        self
    }

    /// Set RNG seed for deterministic behavior
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Build the MockColourSensor
    pub fn build(self) -> MockColourSensor {
        MockColourSensor {
            state: Mutex::new(SensorState::default()),
            scene: self.scene,
            noise: self.noise,
            mode: self.mode,
            timing: self.timing,
            error_config: self.error_config,
            rng: MockRng::new(self.rng_seed),
        }
    }
}
