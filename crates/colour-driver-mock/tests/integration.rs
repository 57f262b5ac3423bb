//! Integration tests for the simulated colour sensor
//!
//! These tests drive the sensor only through the `ColourSensor` trait, the way
//! the harness does.

use colour_core::{ColourSensor, Gain, SensorError, SCALED_MAX};
use colour_driver_mock::*;
use std::sync::Arc;

/// Every documented gain is accepted
#[tokio::test]
async fn test_valid_gains_never_raise() {
    let sensor = MockColourSensor::new();
    for gain in [1, 4, 16, 60] {
        sensor.set_gain(gain).await.unwrap();
        assert_eq!(u32::from(sensor.gain().await.unwrap()), gain);
    }
}

/// Undocumented gains raise InvalidGain
#[tokio::test]
async fn test_invalid_gains_raise() {
    let sensor = MockColourSensor::new();
    for gain in [2, 8, 32] {
        assert_eq!(
            sensor.set_gain(gain).await,
            Err(SensorError::InvalidGain { value: gain })
        );
    }
}

/// The whole cycle range is accepted
#[tokio::test]
async fn test_full_cycle_range_accepted() {
    let sensor = MockColourSensor::new();
    for cycles in 1..=256 {
        sensor.set_integration_cycles(cycles).await.unwrap();
    }
    assert_eq!(sensor.integration_cycles().await.unwrap().get(), 256);
}

/// Out-of-range cycle counts raise and leave the previous settings alone
#[tokio::test]
async fn test_invalid_cycles_raise_without_side_effects() {
    let sensor = MockColourSensor::new();
    sensor.set_integration_cycles(2).await.unwrap();
    for cycles in [0, 257] {
        let err = sensor.set_integration_cycles(cycles).await.unwrap_err();
        assert!(err.is_invalid_integration_cycles());
    }
    assert_eq!(sensor.integration_cycles().await.unwrap().get(), 2);
    assert_eq!(sensor.gain().await.unwrap(), Gain::X1);
}

/// Scaled readings stay in 0..=256 across every gain and a spread of cycles
#[tokio::test]
async fn test_scaled_readings_in_range() {
    let sensor = MockColourSensor::builder().noise(0.05).rng_seed(11).build();
    for gain in [1, 4, 16, 60] {
        sensor.set_gain(gain).await.unwrap();
        for cycles in [1, 2, 63, 64, 200, 256] {
            sensor.set_integration_cycles(cycles).await.unwrap();
            let reading = sensor.colour().await.unwrap();
            assert_eq!(reading.channels().len(), 4);
            assert!(reading.channels().iter().all(|&c| c <= SCALED_MAX));
        }
    }
}

/// A shared handle behaves like the sensor itself
#[tokio::test]
async fn test_trait_object_handle() {
    let sensor: Arc<dyn ColourSensor> = Arc::new(MockColourSensor::new());
    sensor.set_gain(60).await.unwrap();
    assert_eq!(sensor.gain().await.unwrap(), Gain::X60);
}

/// Test error config scenarios
#[tokio::test]
async fn test_communication_loss_affects_all_operations() {
    let sensor = MockColourSensor::builder()
        .error_config(ErrorConfig::scenario(ErrorScenario::CommunicationLoss))
        .build();
    assert!(matches!(
        sensor.colour().await,
        Err(SensorError::Communication(_))
    ));
    assert!(matches!(
        sensor.set_gain(4).await,
        Err(SensorError::Communication(_))
    ));
}
