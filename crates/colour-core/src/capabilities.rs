//! Colour sensor capability trait
//!
//! `ColourSensor` is the contract between the validation harness and a device.
//! It follows the same conventions as the other capability traits in this
//! workspace:
//!
//! - Is async (uses #[async_trait])
//! - Is thread-safe (requires Send + Sync)
//! - Takes `&self`; implementations use interior mutability for state
//!
//! # Contract
//! - Setters accept raw integers and return `InvalidGain` /
//!   `InvalidIntegrationCycles` for rejected values.
//! - A rejected setter call leaves every setting unchanged.
//! - `colour()` returns channels scaled into `0..=256`.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn sample_at_gain<S: ColourSensor>(sensor: &S) -> Result<RgbcReading> {
//!     sensor.set_gain(16).await?;
//!     tokio::time::sleep(2 * sensor.integration_time().await?).await;
//!     sensor.colour().await
//! }
//! ```

use crate::error::{Result, SensorError};
use crate::reading::RgbcReading;
use crate::settings::{Gain, IntegrationCycles};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Capability: RGBC colour sensing with gain and integration control.
#[async_trait]
pub trait ColourSensor: Send + Sync {
    /// Read raw channel counts.
    ///
    /// # Returns
    /// - Ok(reading) with counts in `0..=max_raw`
    /// - Err if the sensor is disabled or the device fails
    async fn colour_raw(&self) -> Result<RgbcReading>;

    /// Read channels scaled into `0..=256`.
    async fn colour(&self) -> Result<RgbcReading> {
        let raw = self.colour_raw().await?;
        let max_raw = self.max_raw().await?;
        Ok(raw.scaled(max_raw))
    }

    /// Current gain.
    async fn gain(&self) -> Result<Gain>;

    /// Set gain from a raw value.
    ///
    /// # Returns
    /// - Ok(()) for 1, 4, 16 or 60
    /// - Err(SensorError::InvalidGain) for anything else
    async fn set_gain(&self, gain: u32) -> Result<()>;

    /// Current integration cycle count.
    async fn integration_cycles(&self) -> Result<IntegrationCycles>;

    /// Set the integration cycle count from a raw value.
    ///
    /// # Returns
    /// - Ok(()) for `1..=256`
    /// - Err(SensorError::InvalidIntegrationCycles) otherwise
    async fn set_integration_cycles(&self, cycles: u32) -> Result<()>;

    /// Time spent integrating one sample.
    async fn integration_time(&self) -> Result<Duration> {
        Ok(self.integration_cycles().await?.integration_time())
    }

    /// Largest raw count at the current integration cycle count.
    async fn max_raw(&self) -> Result<u16> {
        Ok(self.integration_cycles().await?.max_raw())
    }

    /// Whether the sensor is powered up.
    ///
    /// # Default Implementation
    /// Reports an always-on sensor.
    async fn enabled(&self) -> Result<bool> {
        Ok(true)
    }

    /// Power the sensor up or down.
    ///
    /// # Default Implementation
    /// Returns `SensorError::NotSupported`.
    async fn set_enabled(&self, _enabled: bool) -> Result<()> {
        Err(SensorError::NotSupported("set_enabled"))
    }
}

macro_rules! forward_colour_sensor {
    ($(impl<$($lt:lifetime,)? T> for $ty:ty;)+) => {$(
        #[async_trait]
        impl<$($lt,)? T: ColourSensor + ?Sized> ColourSensor for $ty {
            async fn colour_raw(&self) -> Result<RgbcReading> {
                (**self).colour_raw().await
            }

            async fn colour(&self) -> Result<RgbcReading> {
                (**self).colour().await
            }

            async fn gain(&self) -> Result<Gain> {
                (**self).gain().await
            }

            async fn set_gain(&self, gain: u32) -> Result<()> {
                (**self).set_gain(gain).await
            }

            async fn integration_cycles(&self) -> Result<IntegrationCycles> {
                (**self).integration_cycles().await
            }

            async fn set_integration_cycles(&self, cycles: u32) -> Result<()> {
                (**self).set_integration_cycles(cycles).await
            }

            async fn integration_time(&self) -> Result<Duration> {
                (**self).integration_time().await
            }

            async fn max_raw(&self) -> Result<u16> {
                (**self).max_raw().await
            }

            async fn enabled(&self) -> Result<bool> {
                (**self).enabled().await
            }

            async fn set_enabled(&self, enabled: bool) -> Result<()> {
                (**self).set_enabled(enabled).await
            }
        }
    )+};
}

forward_colour_sensor! {
    impl<'a, T> for &'a T;
    impl<T> for Arc<T>;
    impl<T> for Box<T>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Minimal sensor storing settings and returning a fixed raw reading.
    struct FixedSensor {
        raw: RgbcReading,
        gain: Mutex<Gain>,
        cycles: Mutex<IntegrationCycles>,
    }

    impl FixedSensor {
        fn new(raw: RgbcReading) -> Self {
            Self {
                raw,
                gain: Mutex::new(Gain::default()),
                cycles: Mutex::new(IntegrationCycles::default()),
            }
        }
    }

    #[async_trait]
    impl ColourSensor for FixedSensor {
        async fn colour_raw(&self) -> Result<RgbcReading> {
            Ok(self.raw)
        }

        async fn gain(&self) -> Result<Gain> {
            Ok(*self.gain.lock().unwrap())
        }

        async fn set_gain(&self, gain: u32) -> Result<()> {
            *self.gain.lock().unwrap() = Gain::try_from(gain)?;
            Ok(())
        }

        async fn integration_cycles(&self) -> Result<IntegrationCycles> {
            Ok(*self.cycles.lock().unwrap())
        }

        async fn set_integration_cycles(&self, cycles: u32) -> Result<()> {
            *self.cycles.lock().unwrap() = IntegrationCycles::new(cycles)?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn default_colour_scales_by_max_raw() {
        let sensor = FixedSensor::new(RgbcReading::new(1024, 512, 0, 256));
        let scaled = sensor.colour().await.unwrap();
        assert_eq!(scaled, RgbcReading::new(256, 128, 0, 64));

        sensor.set_integration_cycles(2).await.unwrap();
        let scaled = sensor.colour().await.unwrap();
        assert_eq!(scaled, RgbcReading::new(128, 64, 0, 32));
    }

    #[tokio::test]
    async fn default_integration_time_follows_cycles() {
        let sensor = FixedSensor::new(RgbcReading::default());
        sensor.set_integration_cycles(10).await.unwrap();
        assert_eq!(
            sensor.integration_time().await.unwrap(),
            Duration::from_millis(24)
        );
    }

    #[tokio::test]
    async fn rejected_setter_keeps_previous_value() {
        let sensor = FixedSensor::new(RgbcReading::default());
        sensor.set_gain(16).await.unwrap();
        assert!(sensor.set_gain(8).await.unwrap_err().is_invalid_gain());
        assert_eq!(sensor.gain().await.unwrap(), Gain::X16);
    }

    #[tokio::test]
    async fn enable_is_optional() {
        let sensor = FixedSensor::new(RgbcReading::default());
        assert!(sensor.enabled().await.unwrap());
        assert_eq!(
            sensor.set_enabled(false).await,
            Err(SensorError::NotSupported("set_enabled"))
        );
    }

    #[tokio::test]
    async fn shared_handles_forward_to_inner_sensor() {
        let sensor = Arc::new(FixedSensor::new(RgbcReading::default()));
        let shared: Arc<dyn ColourSensor> = sensor.clone();
        shared.set_gain(60).await.unwrap();
        assert_eq!(sensor.gain().await.unwrap(), Gain::X60);
    }

    async fn halve_and_read<S: ColourSensor>(sensor: S) -> Result<RgbcReading> {
        sensor.set_integration_cycles(2).await?;
        sensor.colour().await
    }

    #[tokio::test]
    async fn borrowed_handles_forward_to_inner_sensor() {
        let sensor = FixedSensor::new(RgbcReading::new(512, 0, 0, 0));
        let reading = halve_and_read(&sensor).await.unwrap();
        assert_eq!(reading.red, 64);
        assert_eq!(sensor.integration_cycles().await.unwrap().get(), 2);

        let dynamic: &dyn ColourSensor = &sensor;
        halve_and_read(dynamic).await.unwrap();
    }
}
