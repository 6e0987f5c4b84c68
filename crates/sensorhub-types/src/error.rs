//! Error types for data validation in sensorhub-types.

use thiserror::Error;

/// Errors that can occur when constructing or converting sensor readings.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// The device identifier is empty. `device_id` is the partition key and
    /// must be non-empty.
    #[error("device_id must be non-empty")]
    EmptyDeviceId,

    /// A millisecond timestamp is outside the representable date range.
    #[error("timestamp out of range: {0} ms")]
    TimestampOutOfRange(i64),
}

/// Result type alias using sensorhub-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
