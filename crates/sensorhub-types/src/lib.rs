//! Core types for sensorhub sensor readings.
//!
//! This crate provides the shared data model used by the store, the
//! generator, and the analysis CLI:
//!
//! - [`Reading`] - one sensor observation
//! - [`SensorType`] - open set of sensor tags
//! - [`ValidationError`] - construction/conversion failures
//!
//! # Example
//!
//! ```
//! use sensorhub_types::{Reading, SensorType, timestamp_from_millis};
//!
//! let reading = Reading::new(
//!     "device_1",
//!     timestamp_from_millis(1_700_000_000_000)?,
//!     SensorType::Temperature,
//!     22.5,
//! )?;
//! assert_eq!(reading.timestamp_millis(), 1_700_000_000_000);
//! # Ok::<(), sensorhub_types::ValidationError>(())
//! ```

pub mod error;
pub mod types;

pub use error::{ValidationError, ValidationResult};
pub use types::{Reading, SensorType, timestamp_from_millis};
