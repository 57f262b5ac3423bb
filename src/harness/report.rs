//! Outcome of a validation run.

use super::Phase;
use std::fmt;
use tracing::{error, info, warn};

/// An invalid value the sensor accepted instead of rejecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationFailure {
    /// Phase that offered the value
    pub phase: Phase,
    /// The value that should have been rejected
    pub value: u32,
}

impl fmt::Display for ExpectationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.phase {
            Phase::InvalidGain => write!(f, "gain {} was accepted", self.value),
            Phase::InvalidCycles => {
                write!(f, "integration cycles {} were accepted", self.value)
            }
            phase => write!(f, "{phase}: value {} was accepted", self.value),
        }
    }
}

/// Counters for one executed phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    /// Which phase ran
    pub phase: Phase,
    /// Measurement windows run
    pub windows: usize,
    /// Readings taken across all windows
    pub samples: usize,
    /// Invalid values that were not rejected
    pub unmet: Vec<u32>,
}

impl PhaseReport {
    /// Empty counters for `phase`.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            windows: 0,
            samples: 0,
            unmet: Vec::new(),
        }
    }

    pub(crate) fn record_window(&mut self, samples: usize) {
        self.windows += 1;
        self.samples += samples;
    }

    /// Unmet expectations of this phase.
    pub fn failures(&self) -> impl Iterator<Item = ExpectationFailure> + '_ {
        self.unmet.iter().map(|&value| ExpectationFailure {
            phase: self.phase,
            value,
        })
    }
}

/// Everything a completed run observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    phases: Vec<PhaseReport>,
    strict: bool,
}

impl RunReport {
    pub(crate) fn new(strict: bool) -> Self {
        Self {
            phases: Vec::new(),
            strict,
        }
    }

    pub(crate) fn push(&mut self, phase: PhaseReport) {
        self.phases.push(phase);
    }

    /// Per-phase counters in run order.
    pub fn phases(&self) -> &[PhaseReport] {
        &self.phases
    }

    /// Counters for one phase, if it ran.
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    /// Invalid values the sensor accepted, in run order.
    pub fn failures(&self) -> Vec<ExpectationFailure> {
        self.phases.iter().flat_map(PhaseReport::failures).collect()
    }

    /// Whether unmet expectations fail the run.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Total readings across every phase.
    pub fn total_samples(&self) -> usize {
        self.phases.iter().map(|p| p.samples).sum()
    }

    /// A run passes unless strict mode is on and an expectation was unmet.
    pub fn passed(&self) -> bool {
        !self.strict || self.phases.iter().all(|p| p.unmet.is_empty())
    }

    /// Log one line per unmet expectation followed by a summary line.
    pub fn log_summary(&self) {
        let failures = self.failures();
        for failure in &failures {
            if self.strict {
                error!(phase = %failure.phase, "Expected error not raised: {failure}");
            } else {
                warn!(phase = %failure.phase, "Expected error not raised: {failure}");
            }
        }

        let windows: usize = self.phases.iter().map(|p| p.windows).sum();
        let outcome = if self.passed() { "passed" } else { "FAILED" };
        info!(
            phases = self.phases.len(),
            windows,
            samples = self.total_samples(),
            unmet = failures.len(),
            "Run {outcome}"
        );
    }
}
