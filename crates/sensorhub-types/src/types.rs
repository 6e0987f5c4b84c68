//! Core types for sensorhub sensor readings.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::error::{ValidationError, ValidationResult};

/// Kind of sensor that produced a reading.
///
/// Serialized as a lowercase string tag on the wire (`"temperature"`,
/// `"humidity"`, `"motion"`). The set is open: tags this crate does not know
/// about round-trip through [`SensorType::Other`].
///
/// This enum is marked `#[non_exhaustive]` to allow adding new well-known
/// sensor types in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SensorType {
    /// Ambient temperature in degrees Celsius.
    Temperature,
    /// Relative humidity as a percentage.
    Humidity,
    /// Motion detection, conventionally 0.0 or 1.0.
    Motion,
    /// A sensor tag not covered by the variants above.
    Other(String),
}

impl SensorType {
    /// The wire tag for this sensor type.
    ///
    /// # Examples
    ///
    /// ```
    /// use sensorhub_types::SensorType;
    ///
    /// assert_eq!(SensorType::Temperature.as_str(), "temperature");
    /// assert_eq!(SensorType::Other("co2".into()).as_str(), "co2");
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SensorType::Temperature => "temperature",
            SensorType::Humidity => "humidity",
            SensorType::Motion => "motion",
            SensorType::Other(tag) => tag,
        }
    }
}

impl From<&str> for SensorType {
    /// Map a wire tag to a sensor type. Unknown tags become
    /// [`SensorType::Other`] verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use sensorhub_types::SensorType;
    ///
    /// assert_eq!(SensorType::from("motion"), SensorType::Motion);
    /// assert_eq!(SensorType::from("co2"), SensorType::Other("co2".into()));
    /// ```
    fn from(tag: &str) -> Self {
        match tag {
            "temperature" => SensorType::Temperature,
            "humidity" => SensorType::Humidity,
            "motion" => SensorType::Motion,
            other => SensorType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SensorType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SensorType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(SensorType::from(tag.as_str()))
    }
}

/// One sensor observation.
///
/// Readings are immutable once persisted. The pair
/// (`device_id`, `timestamp`) is unique per stored row; a second write at the
/// same pair overwrites the first (last-write-wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Device identifier; the partition key. Non-empty.
    pub device_id: String,
    /// When the observation was taken; the clustering key, millisecond
    /// resolution.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// What kind of sensor produced the value.
    pub sensor_type: SensorType,
    /// The observed value.
    pub sensor_value: f64,
}

impl Reading {
    /// Create a reading, rejecting an empty `device_id`.
    pub fn new(
        device_id: impl Into<String>,
        timestamp: OffsetDateTime,
        sensor_type: SensorType,
        sensor_value: f64,
    ) -> ValidationResult<Self> {
        let device_id = device_id.into();
        if device_id.is_empty() {
            return Err(ValidationError::EmptyDeviceId);
        }
        Ok(Self {
            device_id,
            timestamp,
            sensor_type,
            sensor_value,
        })
    }

    /// Timestamp as whole milliseconds since the Unix epoch.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        (self.timestamp.unix_timestamp_nanos() / 1_000_000) as i64
    }
}

/// Build an [`OffsetDateTime`] from milliseconds since the Unix epoch.
///
/// # Examples
///
/// ```
/// use sensorhub_types::timestamp_from_millis;
///
/// let ts = timestamp_from_millis(1_500).unwrap();
/// assert_eq!(ts.unix_timestamp_nanos(), 1_500_000_000);
/// ```
pub fn timestamp_from_millis(millis: i64) -> ValidationResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .map_err(|_| ValidationError::TimestampOutOfRange(millis))
}
