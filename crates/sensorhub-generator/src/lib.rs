//! Continuous synthetic sensor data generator for sensorhub.
//!
//! This crate simulates a small device fleet: each sweep draws one random
//! observation per device, writes the whole sweep through a single compiled
//! insert statement, then sleeps for a random interval before the next sweep.
//! Shutdown is cooperative via a cancellation token checked between sweeps.
//!
//! # Configuration
//!
//! The generator reads configuration from
//! `~/.config/sensorhub/generator.toml`:
//!
//! ```toml
//! [storage]
//! path = "~/.local/share/sensorhub/data.db"
//!
//! [schema]
//! keyspace = "iot_data"
//! table = "sensor_readings"
//! replication_factor = 1
//!
//! [generator]
//! devices = ["device_1", "device_2", "device_3"]
//! interval_min_secs = 2.0
//! interval_max_secs = 3.0
//! ```

pub mod config;
pub mod synth;

pub use config::{Config, ConfigError, GeneratorConfig, SchemaConfig, StorageConfig};
