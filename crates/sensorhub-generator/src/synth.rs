//! Synthetic reading policy.
//!
//! Each observation picks a sensor type uniformly at random and draws a value
//! from that type's range. Continuous values are rounded to 2 decimal places;
//! motion is binary.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

use sensorhub_types::SensorType;

/// Temperature range in degrees Celsius.
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 20.0..=35.0;

/// Relative humidity range in percent.
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 30.0..=90.0;

/// Draw one synthetic observation.
pub fn sample_observation<R: Rng + ?Sized>(rng: &mut R) -> (SensorType, f64) {
    let pick: u8 = rng.random_range(0..3);
    match pick {
        0 => (
            SensorType::Temperature,
            round2(rng.random_range(TEMPERATURE_RANGE)),
        ),
        1 => (
            SensorType::Humidity,
            round2(rng.random_range(HUMIDITY_RANGE)),
        ),
        _ => (
            SensorType::Motion,
            if rng.random_bool(0.5) { 1.0 } else { 0.0 },
        ),
    }
}

/// Sleep between device sweeps, drawn uniformly from `[min_secs, max_secs]`.
pub fn sweep_delay<R: Rng + ?Sized>(rng: &mut R, min_secs: f64, max_secs: f64) -> Duration {
    Duration::from_secs_f64(rng.random_range(min_secs..=max_secs))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
