//! Error injection framework for the simulated sensor.
//!
//! Enables configurable failures so the harness's fatal-error and propagation
//! paths can be exercised without hardware. Injected failures are reported as
//! operational [`SensorError`]s, never as the configuration errors the harness
//! provokes on purpose.

use super::rng::MockRng;
use colour_core::SensorError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Error injection configuration for mock devices.
///
/// Scenarios are checked first, then the random failure rate, which applies
/// to every operation alike.
#[derive(Clone, Debug)]
pub struct ErrorConfig {
    failure_rate: f64,
    scenarios: Arc<[ErrorScenario]>,
    rng: Arc<MockRng>,
    state: Arc<Mutex<InjectionState>>,
}

/// A deterministic failure pattern.
#[derive(Debug, Clone)]
pub enum ErrorScenario {
    /// Fail after N successful calls of one operation
    FailAfterN {
        /// Operation name, e.g. `"colour_raw"`
        operation: &'static str,
        /// Calls allowed to succeed
        count: u32,
    },
    /// Every call of one operation times out
    Timeout {
        /// Operation name
        operation: &'static str,
    },
    /// The bus goes away on the first call; later calls fail too
    CommunicationLoss,
    /// Latched hardware fault with a specific code
    HardwareFault {
        /// Fault code reported in the message
        code: u32,
    },
}

#[derive(Default, Debug)]
struct InjectionState {
    calls: HashMap<&'static str, u32>,
    latched: Option<SensorError>,
}

impl ErrorConfig {
    /// No injected failures.
    pub fn none() -> Self {
        Self::build(0.0, Vec::new(), None)
    }

    /// Fail any operation with probability `rate`, reproducibly for a given seed.
    pub fn random_failures_seeded(rate: f64, seed: Option<u64>) -> Self {
        Self::build(rate, Vec::new(), seed)
    }

    /// A single deterministic scenario.
    pub fn scenario(scenario: ErrorScenario) -> Self {
        Self::scenarios(vec![scenario])
    }

    /// Several deterministic scenarios, checked in order.
    pub fn scenarios(scenarios: Vec<ErrorScenario>) -> Self {
        Self::build(0.0, scenarios, None)
    }

    fn build(failure_rate: f64, scenarios: Vec<ErrorScenario>, seed: Option<u64>) -> Self {
        Self {
            failure_rate,
            scenarios: scenarios.into(),
            rng: Arc::new(MockRng::new(seed)),
            state: Arc::new(Mutex::new(InjectionState::default())),
        }
    }

    /// Decide whether `operation` fails, returning the injected error if so.
    pub fn check_operation(&self, operation: &'static str) -> Result<(), SensorError> {
        let mut state = self.state.lock();

        if let Some(err) = &state.latched {
            return Err(err.clone());
        }

        for scenario in self.scenarios.iter() {
            match *scenario {
                ErrorScenario::FailAfterN {
                    operation: op,
                    count,
                } if op == operation => {
                    let calls = state.calls.entry(operation).or_insert(0);
                    *calls += 1;
                    if *calls > count {
                        return Err(SensorError::Hardware(format!(
                            "injected failure after {count} '{operation}' calls"
                        )));
                    }
                }
                ErrorScenario::Timeout { operation: op } if op == operation => {
                    return Err(SensorError::Timeout(format!(
                        "operation '{operation}' timed out"
                    )));
                }
                ErrorScenario::CommunicationLoss => {
                    let err = SensorError::Communication("communication lost".into());
                    state.latched = Some(err.clone());
                    return Err(err);
                }
                ErrorScenario::HardwareFault { code } => {
                    let err = SensorError::Hardware(format!("hardware fault: {code}"));
                    state.latched = Some(err.clone());
                    return Err(err);
                }
                _ => {}
            }
        }

        if self.rng.should_fail(self.failure_rate) {
            return Err(SensorError::Hardware(format!(
                "random failure on operation '{operation}'"
            )));
        }
        Ok(())
    }
}

impl Default for ErrorConfig {
    fn default() -> Self {
        Self::none()
    }
}
