//! Validation harness for colour sensor settings.
//!
//! A [`Harness`] drives one [`ColourSensor`] through five phases, in order:
//!
//! 1. measure with the sensor's current settings (a failure here is fatal)
//! 2. sweep every valid gain
//! 3. offer invalid gains, expecting `InvalidGain`
//! 4. sweep every valid integration cycle count at 1x gain
//! 5. offer invalid cycle counts, expecting `InvalidIntegrationCycles`
//!
//! Each accepted setting is followed by a measurement window that samples
//! until its deadline, sleeping twice the integration time between readings.
//! Invalid values that the sensor accepts are recorded in the [`RunReport`];
//! with `strict_expectations` they fail the run.

mod phase;
mod report;

pub use phase::Phase;
pub use report::{ExpectationFailure, PhaseReport, RunReport};

use crate::config::HarnessConfig;
use crate::error::HarnessError;
use colour_core::{ColourSensor, SensorError};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, instrument};

/// Lower bound on the pause between two readings of a window.
pub const MIN_SAMPLE_INTERVAL: Duration = Duration::from_millis(1);

/// Runs validation phases against an injected sensor.
#[derive(Debug)]
pub struct Harness<S> {
    sensor: S,
    config: HarnessConfig,
}

impl<S: ColourSensor> Harness<S> {
    /// Create a harness around `sensor`.
    pub fn new(sensor: S, config: HarnessConfig) -> Self {
        Self { sensor, config }
    }

    /// The sensor under test.
    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    /// The test plan.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Give the sensor back.
    pub fn into_sensor(self) -> S {
        self.sensor
    }

    /// Run every phase in order.
    pub async fn run(&self) -> Result<RunReport, HarnessError> {
        self.run_phases(&Phase::ALL).await
    }

    /// Run a selection of phases in run order, skipping duplicates.
    ///
    /// Stops at the first unexpected sensor error. Unmet expectations do not
    /// stop the run; check [`RunReport::passed`].
    pub async fn run_phases(&self, phases: &[Phase]) -> Result<RunReport, HarnessError> {
        let mut report = RunReport::new(self.config.strict_expectations);

        for phase in Phase::in_run_order(phases) {
            let phase_report = match phase {
                Phase::DefaultSettings => self.run_default_settings().await?,
                Phase::ValidGain => self.run_valid_gain_sweep().await?,
                Phase::InvalidGain => self.run_invalid_gain_sweep().await?,
                Phase::ValidCycles => self.run_valid_cycle_sweep().await?,
                Phase::InvalidCycles => self.run_invalid_cycle_sweep().await?,
            };
            report.push(phase_report);
        }

        info!("Tests completed");
        report.log_summary();
        Ok(report)
    }

    /// Sample the sensor until `window` has elapsed.
    ///
    /// Sleeps for twice the current integration time before each reading and
    /// logs every scaled reading. Returns the number of readings taken; a zero
    /// window takes none.
    pub async fn measure(&self, window: Duration) -> Result<usize, SensorError> {
        let deadline = Instant::now() + window;
        let mut samples = 0;

        while Instant::now() < deadline {
            let interval = (2 * self.sensor.integration_time().await?).max(MIN_SAMPLE_INTERVAL);
            sleep(interval).await;
            let reading = self.sensor.colour().await?;
            info!("{reading}");
            samples += 1;
        }

        debug!(samples, window = ?window, "Measurement window closed");
        Ok(samples)
    }

    /// Measure once with the sensor's current settings.
    ///
    /// Any error here means the sensor cannot be trusted, so the run stops.
    pub async fn run_default_settings(&self) -> Result<PhaseReport, HarnessError> {
        let mut report = PhaseReport::new(Phase::DefaultSettings);
        info!("Testing that readings with default values work...");

        match self.measure(self.config.time_per_test).await {
            Ok(samples) => report.record_window(samples),
            Err(e) => {
                error!("Received {e} while running default test. Quitting...");
                return Err(HarnessError::DefaultPhaseFailed { source: e });
            }
        }
        Ok(report)
    }

    /// Set each valid gain and measure with it.
    #[instrument(skip(self), err)]
    pub async fn run_valid_gain_sweep(&self) -> Result<PhaseReport, HarnessError> {
        let phase = Phase::ValidGain;
        let mut report = PhaseReport::new(phase);
        info!("Testing setting the gain...");

        for &gain in &self.config.valid_gains {
            self.sensor
                .set_gain(gain)
                .await
                .map_err(|e| unexpected(phase, e))?;
            info!("Gain: {gain}");
            report.record_window(self.measure_in(phase).await?);
        }
        Ok(report)
    }

    /// Offer each invalid gain; every one must be rejected.
    #[instrument(skip(self), err)]
    pub async fn run_invalid_gain_sweep(&self) -> Result<PhaseReport, HarnessError> {
        let phase = Phase::InvalidGain;
        let mut report = PhaseReport::new(phase);
        info!("Testing setting an invalid gain... expecting an InvalidGain error.");

        for &gain in &self.config.invalid_gains {
            match self.sensor.set_gain(gain).await {
                Err(e) if e.is_invalid_gain() => {
                    info!("Received InvalidGain error '{e}' as expected!");
                }
                Err(e) => return Err(unexpected(phase, e)),
                Ok(()) => {
                    info!("Gain: {gain}");
                    report.record_window(self.measure_in(phase).await?);
                    report.unmet.push(gain);
                }
            }
        }
        Ok(report)
    }

    /// Reset gain to 1x, then set each valid cycle count and measure with it.
    #[instrument(skip(self), err)]
    pub async fn run_valid_cycle_sweep(&self) -> Result<PhaseReport, HarnessError> {
        let phase = Phase::ValidCycles;
        let mut report = PhaseReport::new(phase);

        self.sensor
            .set_gain(1)
            .await
            .map_err(|e| unexpected(phase, e))?;
        info!("Testing setting the number of integration cycles...");

        for cycles in self.config.valid_cycles.iter() {
            self.sensor
                .set_integration_cycles(cycles)
                .await
                .map_err(|e| unexpected(phase, e))?;
            info!("Integration cycle: {cycles}");
            report.record_window(self.measure_in(phase).await?);
        }
        Ok(report)
    }

    /// Set the baseline cycle count, then offer each invalid count; every one
    /// must be rejected.
    #[instrument(skip(self), err)]
    pub async fn run_invalid_cycle_sweep(&self) -> Result<PhaseReport, HarnessError> {
        let phase = Phase::InvalidCycles;
        let mut report = PhaseReport::new(phase);

        self.sensor
            .set_integration_cycles(self.config.baseline_cycles)
            .await
            .map_err(|e| unexpected(phase, e))?;
        info!("Testing setting an invalid integration cycle.");

        for &cycles in &self.config.invalid_cycles {
            info!("Integration cycle: {cycles}");
            match self.sensor.set_integration_cycles(cycles).await {
                Err(e) if e.is_invalid_integration_cycles() => {
                    info!("Received '{e}' as expected");
                }
                Err(e) => return Err(unexpected(phase, e)),
                Ok(()) => {
                    report.record_window(self.measure_in(phase).await?);
                    report.unmet.push(cycles);
                }
            }
        }
        Ok(report)
    }

    async fn measure_in(&self, phase: Phase) -> Result<usize, HarnessError> {
        self.measure(self.config.time_per_test)
            .await
            .map_err(|e| unexpected(phase, e))
    }
}

fn unexpected(phase: Phase, source: SensorError) -> HarnessError {
    HarnessError::UnexpectedSensorError { phase, source }
}

/// Exit status of a run that completed with a passing report.
pub const EXIT_PASSED: u8 = 0;
/// Exit status of a failed or aborted run.
pub const EXIT_FAILED: u8 = 1;

/// Process exit status for the outcome of [`Harness::run_phases`].
pub fn exit_status(outcome: &Result<RunReport, HarnessError>) -> u8 {
    match outcome {
        Ok(report) if report.passed() => EXIT_PASSED,
        _ => EXIT_FAILED,
    }
}
