//! Gain and integration-cycle settings.
//!
//! Both settings are validated on construction, so holding a `Gain` or an
//! `IntegrationCycles` means the value is one the sensor accepts. Setters on
//! [`ColourSensor`](crate::ColourSensor) take raw integers so that callers can
//! deliberately probe out-of-range values.

use crate::error::SensorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Analog gain applied before integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Gain {
    /// 1x (power-on default)
    #[default]
    X1,
    /// 4x
    X4,
    /// 16x
    X16,
    /// 60x
    X60,
}

impl Gain {
    /// Every accepted gain, in ascending order.
    pub const ALL: [Gain; 4] = [Gain::X1, Gain::X4, Gain::X16, Gain::X60];

    /// Multiplication factor of this setting.
    pub const fn multiplier(self) -> u32 {
        match self {
            Gain::X1 => 1,
            Gain::X4 => 4,
            Gain::X16 => 16,
            Gain::X60 => 60,
        }
    }
}

impl TryFrom<u32> for Gain {
    type Error = SensorError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gain::X1),
            4 => Ok(Gain::X4),
            16 => Ok(Gain::X16),
            60 => Ok(Gain::X60),
            _ => Err(SensorError::InvalidGain { value }),
        }
    }
}

impl From<Gain> for u32 {
    fn from(gain: Gain) -> Self {
        gain.multiplier()
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.multiplier())
    }
}

/// Number of 2.4 ms integration cycles per sample, in `1..=256`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct IntegrationCycles(u16);

impl IntegrationCycles {
    /// Smallest accepted cycle count.
    pub const MIN: u16 = 1;
    /// Largest accepted cycle count.
    pub const MAX: u16 = 256;
    /// Duration of a single integration cycle.
    pub const CYCLE_DURATION: Duration = Duration::from_micros(2400);

    /// Validate a raw cycle count.
    pub fn new(cycles: u32) -> Result<Self, SensorError> {
        u16::try_from(cycles)
            .ok()
            .filter(|c| (Self::MIN..=Self::MAX).contains(c))
            .map(Self)
            .ok_or(SensorError::InvalidIntegrationCycles { value: cycles })
    }

    /// Raw cycle count.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Time the sensor spends integrating one sample.
    pub fn integration_time(self) -> Duration {
        Self::CYCLE_DURATION * u32::from(self.0)
    }

    /// Largest raw count a channel can report at this cycle count.
    ///
    /// Each cycle adds up to 1024 counts until the 16-bit register saturates.
    pub fn max_raw(self) -> u16 {
        u16::try_from(1024 * u32::from(self.0)).unwrap_or(u16::MAX)
    }

    /// All valid cycle counts in ascending order.
    pub fn iter_all() -> impl Iterator<Item = IntegrationCycles> {
        (Self::MIN..=Self::MAX).map(IntegrationCycles)
    }
}

impl Default for IntegrationCycles {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u32> for IntegrationCycles {
    type Error = SensorError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IntegrationCycles> for u32 {
    fn from(cycles: IntegrationCycles) -> Self {
        u32::from(cycles.0)
    }
}

impl fmt::Display for IntegrationCycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
