//! RGBC readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a scaled channel value.
pub const SCALED_MAX: u16 = 256;

/// One sample of the red, green, blue and clear channels.
///
/// The same type carries raw register counts (`0..=max_raw`) and scaled values
/// (`0..=256`); [`RgbcReading::scaled`] converts the former into the latter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RgbcReading {
    /// Red channel
    pub red: u16,
    /// Green channel
    pub green: u16,
    /// Blue channel
    pub blue: u16,
    /// Clear (unfiltered) channel
    pub clear: u16,
}

impl RgbcReading {
    /// Create a reading from its four channels.
    pub const fn new(red: u16, green: u16, blue: u16, clear: u16) -> Self {
        Self {
            red,
            green,
            blue,
            clear,
        }
    }

    /// Channels in `[red, green, blue, clear]` order.
    pub const fn channels(&self) -> [u16; 4] {
        [self.red, self.green, self.blue, self.clear]
    }

    /// Scale raw counts into `0..=256` given the largest count the sensor can
    /// currently report.
    pub fn scaled(&self, max_raw: u16) -> Self {
        let max_raw = u32::from(max_raw.max(1));
        let scale = |raw: u16| -> u16 {
            let value = u32::from(raw) * u32::from(SCALED_MAX) / max_raw;
            value.min(u32::from(SCALED_MAX)) as u16
        };
        Self {
            red: scale(self.red),
            green: scale(self.green),
            blue: scale(self.blue),
            clear: scale(self.clear),
        }
    }
}

impl fmt::Display for RgbcReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R: {}, G: {}, B: {}, C: {}",
            self.red, self.green, self.blue, self.clear
        )
    }
}
