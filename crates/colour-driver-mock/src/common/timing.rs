//! Timing configuration for realistic mode.

use std::time::Duration;

/// Hardware-like delays applied by the simulated sensor outside instant mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimingConfig {
    /// Settling time in milliseconds after a setting changes
    pub settling_time_ms: u64,
    /// Communication delay in milliseconds per bus transaction
    pub communication_delay_ms: u64,
}

impl TimingConfig {
    /// Timing for an I2C colour sensor: one integration cycle to latch a new
    /// setting, about a millisecond per register transfer.
    pub fn colour_sensor() -> Self {
        Self {
            settling_time_ms: 3,
            communication_delay_ms: 1,
        }
    }

    /// Settling delay as a `Duration`.
    pub fn settling(&self) -> Duration {
        Duration::from_millis(self.settling_time_ms)
    }

    /// Communication delay as a `Duration`.
    pub fn communication(&self) -> Duration {
        Duration::from_millis(self.communication_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_delays() {
        let timing = TimingConfig::default();
        assert_eq!(timing.settling(), Duration::ZERO);
        assert_eq!(timing.communication(), Duration::ZERO);
    }

    #[test]
    fn colour_sensor_timing() {
        let timing = TimingConfig::colour_sensor();
        assert_eq!(timing.settling(), Duration::from_millis(3));
        assert_eq!(timing.communication(), Duration::from_millis(1));
    }
}
