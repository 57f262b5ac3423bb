//! Named harness phases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a validation run. Phases always run in declaration order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Measure with whatever settings the sensor currently has
    DefaultSettings,
    /// Every supported gain must be accepted
    ValidGain,
    /// Unsupported gains must raise an invalid-gain error
    InvalidGain,
    /// Every supported cycle count must be accepted
    ValidCycles,
    /// Unsupported cycle counts must raise an invalid-cycles error
    InvalidCycles,
}

impl Phase {
    /// All phases in run order.
    pub const ALL: [Phase; 5] = [
        Phase::DefaultSettings,
        Phase::ValidGain,
        Phase::InvalidGain,
        Phase::ValidCycles,
        Phase::InvalidCycles,
    ];

    /// Kebab-case name used in logs and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::DefaultSettings => "default-settings",
            Phase::ValidGain => "valid-gain",
            Phase::InvalidGain => "invalid-gain",
            Phase::ValidCycles => "valid-cycles",
            Phase::InvalidCycles => "invalid-cycles",
        }
    }

    /// Sort and deduplicate a selection into run order.
    pub fn in_run_order(selection: &[Phase]) -> Vec<Phase> {
        let mut phases = selection.to_vec();
        phases.sort_unstable();
        phases.dedup();
        phases
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
