//! Configuration System using Figment
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. Built-in defaults (the standard test plan against a quiet simulated sensor)
//! 2. A TOML file (`config/colour_check.toml` unless another path is given)
//! 3. Environment variables prefixed with `COLOUR_CHECK_`, using `__` to
//!    separate nested keys
//!
//! # Example
//! ```no_run
//! use colour_check::config::Settings;
//!
//! // COLOUR_CHECK_HARNESS__TIME_PER_TEST=2s overrides the window length
//! let settings = Settings::load(None)?;
//! settings.validate()?;
//! # Ok::<(), colour_check::error::AppError>(())
//! ```

use crate::error::{AppError, AppResult};
use crate::logging::OutputFormat;
use colour_core::{Gain, IntegrationCycles};
use colour_driver_mock::MockColourSensorConfig;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/colour_check.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "COLOUR_CHECK_";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Test plan
    #[serde(default)]
    pub harness: HarnessConfig,
    /// Simulated sensor
    #[serde(default)]
    pub sensor: MockColourSensorConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log line format
    #[serde(default)]
    pub log_format: OutputFormat,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: OutputFormat::default(),
        }
    }
}

/// Inclusive range of integration cycle counts to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRange {
    /// First cycle count
    pub start: u32,
    /// Last cycle count (inclusive)
    pub end: u32,
}

impl CycleRange {
    /// Iterate the range in ascending order.
    pub fn iter(&self) -> std::ops::RangeInclusive<u32> {
        self.start..=self.end
    }
}

impl Default for CycleRange {
    fn default() -> Self {
        Self {
            start: u32::from(IntegrationCycles::MIN),
            end: u32::from(IntegrationCycles::MAX),
        }
    }
}

/// The test plan: sweep values, window length and strictness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Length of each measurement window
    #[serde(default = "default_time_per_test", with = "humantime_serde")]
    pub time_per_test: Duration,
    /// Gains that must be accepted
    #[serde(default = "default_valid_gains")]
    pub valid_gains: Vec<u32>,
    /// Gains that must be rejected with an invalid-gain error
    #[serde(default = "default_invalid_gains")]
    pub invalid_gains: Vec<u32>,
    /// Cycle counts that must be accepted
    #[serde(default)]
    pub valid_cycles: CycleRange,
    /// Cycle counts that must be rejected with an invalid-cycles error
    #[serde(default = "default_invalid_cycles")]
    pub invalid_cycles: Vec<u32>,
    /// Cycle count set before probing invalid cycle counts
    #[serde(default = "default_baseline_cycles")]
    pub baseline_cycles: u32,
    /// Whether a missing expected error fails the run
    #[serde(default = "default_strict")]
    pub strict_expectations: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            time_per_test: default_time_per_test(),
            valid_gains: default_valid_gains(),
            invalid_gains: default_invalid_gains(),
            valid_cycles: CycleRange::default(),
            invalid_cycles: default_invalid_cycles(),
            baseline_cycles: default_baseline_cycles(),
            strict_expectations: default_strict(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_time_per_test() -> Duration {
    Duration::from_secs(10)
}

fn default_valid_gains() -> Vec<u32> {
    Gain::ALL.iter().map(|g| g.multiplier()).collect()
}

fn default_invalid_gains() -> Vec<u32> {
    vec![2, 8, 32]
}

fn default_invalid_cycles() -> Vec<u32> {
    vec![0, 257]
}

fn default_baseline_cycles() -> u32 {
    2
}

fn default_strict() -> bool {
    true
}

impl Settings {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// With `path == None` the default file is used when present. An explicit
    /// path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let file = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(AppError::Configuration(format!(
                        "config file '{}' not found",
                        path.display()
                    )));
                }
                path
            }
            None => Path::new(DEFAULT_CONFIG_PATH),
        };
        Self::figment(file).extract().map_err(AppError::from)
    }

    /// Layered figment used by [`Settings::load`].
    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Configuration(e.to_string()))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |msg: String| Err(AppError::Configuration(msg));

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.to_lowercase().as_str()) {
            return invalid(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        let harness = &self.harness;
        if harness.valid_gains.is_empty() {
            return invalid("harness.valid_gains must not be empty".into());
        }
        if let Some(gain) = harness
            .valid_gains
            .iter()
            .find(|&&g| Gain::try_from(g).is_err())
        {
            return invalid(format!(
                "harness.valid_gains contains {gain}, which is not a supported gain"
            ));
        }
        if let Some(gain) = harness
            .invalid_gains
            .iter()
            .find(|&&g| Gain::try_from(g).is_ok())
        {
            return invalid(format!(
                "harness.invalid_gains contains {gain}, which is a supported gain"
            ));
        }

        let cycles = harness.valid_cycles;
        if cycles.start > cycles.end {
            return invalid(format!(
                "harness.valid_cycles start {} is after end {}",
                cycles.start, cycles.end
            ));
        }
        for bound in [cycles.start, cycles.end] {
            if IntegrationCycles::new(bound).is_err() {
                return invalid(format!(
                    "harness.valid_cycles bound {bound} is outside {}..={}",
                    IntegrationCycles::MIN,
                    IntegrationCycles::MAX
                ));
            }
        }
        if let Some(value) = harness
            .invalid_cycles
            .iter()
            .find(|&&c| IntegrationCycles::new(c).is_ok())
        {
            return invalid(format!(
                "harness.invalid_cycles contains {value}, which is a supported cycle count"
            ));
        }
        if IntegrationCycles::new(harness.baseline_cycles).is_err() {
            return invalid(format!(
                "harness.baseline_cycles {} is not a supported cycle count",
                harness.baseline_cycles
            ));
        }

        let sensor = &self.sensor;
        if !(0.0..=1.0).contains(&sensor.noise) {
            return invalid(format!("sensor.noise {} must be in 0..=1", sensor.noise));
        }
        if !(0.0..=1.0).contains(&sensor.failure_rate) {
            return invalid(format!(
                "sensor.failure_rate {} must be in 0..=1",
                sensor.failure_rate
            ));
        }
        let scene = sensor.scene;
        if [scene.red, scene.green, scene.blue, scene.clear]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return invalid("sensor.scene values must be finite and non-negative".into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colour_driver_mock::MockMode;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_describe_standard_test_plan() {
        let settings = Settings::default();
        assert_eq!(settings.harness.time_per_test, Duration::from_secs(10));
        assert_eq!(settings.harness.valid_gains, vec![1, 4, 16, 60]);
        assert_eq!(settings.harness.invalid_gains, vec![2, 8, 32]);
        assert_eq!(settings.harness.valid_cycles.iter().count(), 256);
        assert_eq!(settings.harness.invalid_cycles, vec![0, 257]);
        assert_eq!(settings.harness.baseline_cycles, 2);
        assert!(settings.harness.strict_expectations);
        assert!(settings.validate().is_ok());
    }

    #[test]
    #[serial]
    fn loads_toml_file_over_defaults() {
        let file = write_config(
            r#"
            [application]
            log_level = "debug"
            log_format = "json"

            [harness]
            time_per_test = "250ms"
            invalid_gains = [3]
            strict_expectations = false

            [sensor]
            mode = "realistic"
            seed = 9
            "#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.application.log_level, "debug");
        assert_eq!(settings.application.log_format, OutputFormat::Json);
        assert_eq!(settings.harness.time_per_test, Duration::from_millis(250));
        assert_eq!(settings.harness.invalid_gains, vec![3]);
        assert_eq!(settings.harness.valid_gains, vec![1, 4, 16, 60]);
        assert!(!settings.harness.strict_expectations);
        assert_eq!(settings.sensor.mode, MockMode::Realistic);
        assert_eq!(settings.sensor.seed, Some(9));
    }

    #[test]
    #[serial]
    fn environment_overrides_file() {
        let file = write_config("[harness]\ntime_per_test = \"5s\"\n");
        std::env::set_var("COLOUR_CHECK_HARNESS__TIME_PER_TEST", "1s");
        std::env::set_var("COLOUR_CHECK_APPLICATION__LOG_LEVEL", "warn");
        let settings = Settings::load(Some(file.path()));
        std::env::remove_var("COLOUR_CHECK_HARNESS__TIME_PER_TEST");
        std::env::remove_var("COLOUR_CHECK_APPLICATION__LOG_LEVEL");

        let settings = settings.unwrap();
        assert_eq!(settings.harness.time_per_test, Duration::from_secs(1));
        assert_eq!(settings.application.log_level, "warn");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = Settings::load(Some(Path::new("/nonexistent/colour_check.toml")));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    #[serial]
    fn malformed_file_is_a_config_error() {
        let file = write_config("[harness]\nvalid_gains = \"lots\"\n");
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn rejects_invalid_log_level() {
        let mut settings = Settings::default();
        settings.application.log_level = "loud".into();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_inconsistent_gain_plan() {
        let mut settings = Settings::default();
        settings.harness.valid_gains = vec![1, 2];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.harness.invalid_gains = vec![16];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.harness.valid_gains.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_inconsistent_cycle_plan() {
        let mut settings = Settings::default();
        settings.harness.valid_cycles = CycleRange { start: 10, end: 5 };
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.harness.valid_cycles = CycleRange { start: 0, end: 5 };
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.harness.invalid_cycles = vec![0, 128];
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.harness.baseline_cycles = 300;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_sensor_settings() {
        let mut settings = Settings::default();
        settings.sensor.noise = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.sensor.failure_rate = -0.1;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.sensor.scene.blue = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn renders_effective_config_as_toml() {
        let rendered = Settings::default().to_toml().unwrap();
        assert!(rendered.contains("time_per_test = \"10s\""));
        assert!(rendered.contains("[sensor]"));
    }
}
