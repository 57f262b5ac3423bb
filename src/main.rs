//! CLI Entry Point for colour-check
//!
//! Runs the validation harness against the simulated colour sensor described
//! by the `[sensor]` config section.
//!
//! # Usage
//!
//! Run every phase:
//! ```bash
//! colour-check run --config config/colour_check.toml
//! ```
//!
//! Run only the invalid-value phases with short windows:
//! ```bash
//! colour-check run --time-per-test 500ms --phase invalid-gain --phase invalid-cycles
//! ```
//!
//! Print the effective configuration:
//! ```bash
//! colour-check show-config
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colour_check::config::Settings;
use colour_check::harness::{exit_status, Harness, Phase, EXIT_FAILED};
use colour_check::logging;
use colour_driver_mock::MockColourSensor;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "colour-check")]
#[command(about = "Validate colour sensor gain and integration-cycle handling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the validation phases
    Run {
        /// Config file (defaults to config/colour_check.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Length of each measurement window, e.g. "10s" or "250ms"
        #[arg(long, value_parser = parse_duration)]
        time_per_test: Option<Duration>,

        /// Phase to run; repeat to select several (default: all)
        #[arg(long = "phase", value_enum)]
        phases: Vec<Phase>,
    },

    /// Print the effective configuration as TOML
    ShowConfig {
        /// Config file (defaults to config/colour_check.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_duration(value: &str) -> Result<Duration, humantime_serde::re::humantime::DurationError> {
    humantime_serde::re::humantime::parse_duration(value)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            time_per_test,
            phases,
        } => run(config, time_per_test, phases).await,
        Commands::ShowConfig { config } => show_config(config),
    }
}

fn load_settings(path: Option<PathBuf>) -> Result<Settings> {
    let settings = Settings::load(path.as_deref()).context("failed to load configuration")?;
    settings.validate()?;
    Ok(settings)
}

async fn run(
    config: Option<PathBuf>,
    time_per_test: Option<Duration>,
    phases: Vec<Phase>,
) -> Result<ExitCode> {
    let mut settings = load_settings(config)?;
    if let Some(window) = time_per_test {
        settings.harness.time_per_test = window;
    }
    logging::init_from_settings(&settings)?;

    let phases = if phases.is_empty() {
        Phase::ALL.to_vec()
    } else {
        phases
    };

    info!(
        mode = ?settings.sensor.mode,
        time_per_test = ?settings.harness.time_per_test,
        "Starting colour sensor validation"
    );
    let sensor = MockColourSensor::from_config(&settings.sensor);
    let harness = Harness::new(sensor, settings.harness);

    tokio::select! {
        outcome = harness.run_phases(&phases) => {
            match &outcome {
                Ok(report) if !report.passed() => {
                    error!(unmet = report.failures().len(), "Validation failed");
                }
                Err(e) => error!("Validation stopped: {e}"),
                Ok(_) => {}
            }
            Ok(ExitCode::from(exit_status(&outcome)))
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            warn!("Interrupted, stopping validation");
            Ok(ExitCode::from(EXIT_FAILED))
        }
    }
}

fn show_config(config: Option<PathBuf>) -> Result<ExitCode> {
    let settings = load_settings(config)?;
    print!("{}", settings.to_toml()?);
    Ok(ExitCode::SUCCESS)
}
