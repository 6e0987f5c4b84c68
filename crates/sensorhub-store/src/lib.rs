//! Partitioned, clustered persistence for sensorhub sensor readings.
//!
//! Readings are laid out for time-series access: partitioned by `device_id`
//! (all rows for one device are colocated) and clustered by `timestamp`
//! descending (newest first), so "latest N readings for a device" is a single
//! ordered scan of one partition.
//!
//! # Features
//!
//! - Idempotent keyspace and table creation
//! - Single compiled insert statement, reused for every write
//! - Recent-readings query, newest first, with a row limit
//! - Client-side average over a device + sensor-type slice
//! - Distinct-device catalog
//!
//! # Example
//!
//! ```no_run
//! use sensorhub_store::{DEFAULT_KEYSPACE, DEFAULT_TABLE, Store, TableRef};
//!
//! let store = Store::open_default()?;
//! store.ensure_keyspace(DEFAULT_KEYSPACE, 1)?;
//! let table = TableRef::new(DEFAULT_KEYSPACE, DEFAULT_TABLE)?;
//! store.ensure_table(&table)?;
//!
//! let recent = store.recent_readings(&table, "device_1", 10)?;
//! # Ok::<(), sensorhub_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use schema::{MAX_IDENTIFIER_LEN, TableRef, validate_identifier};
pub use store::{InsertHandle, Store};

/// Default keyspace name.
pub const DEFAULT_KEYSPACE: &str = "iot_data";

/// Default readings table name.
pub const DEFAULT_TABLE: &str = "sensor_readings";

/// Default replication factor for new keyspaces.
pub const DEFAULT_REPLICATION_FACTOR: u32 = 1;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/sensorhub/data.db`
/// - macOS: `~/Library/Application Support/sensorhub/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\sensorhub\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("sensorhub")
        .join("data.db")
}
