//! Main store implementation.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use sensorhub_types::{Reading, SensorType, timestamp_from_millis};

use crate::error::{Error, Result};
use crate::schema::{self, TableRef};

/// Handle to the partitioned reading store.
///
/// One `Store` wraps one engine connection. Open it once at process start,
/// keep it for the life of the process, and let it drop on shutdown; every
/// operation on it is synchronous and blocking.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path).map_err(Error::Connection)?;

        // WAL lets the generator keep writing while readers query concurrently.
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(Error::Connection)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Connection)?;
        Ok(Self { conn })
    }

    // === Schema operations ===

    /// Register a keyspace if absent. Idempotent.
    ///
    /// Fails with [`Error::Schema`] when `replication_factor < 1` or the name
    /// is not a valid identifier.
    pub fn ensure_keyspace(&self, name: &str, replication_factor: u32) -> Result<()> {
        schema::ensure_keyspace(&self.conn, name, replication_factor)
    }

    /// Create the readings table if absent. Idempotent.
    ///
    /// Fails with [`Error::Schema`] when the keyspace has not been registered.
    pub fn ensure_table(&self, table: &TableRef) -> Result<()> {
        schema::ensure_table(&self.conn, table)
    }
}

/// Pre-compiled insert statement bound to one table.
///
/// This is the only insert path: create the handle once and reuse it for
/// every write. Column order is fixed to
/// `(device_id, timestamp, sensor_type, sensor_value)`.
pub struct InsertHandle<'conn> {
    stmt: rusqlite::Statement<'conn>,
}

impl InsertHandle<'_> {
    /// Insert one reading.
    ///
    /// Overwrites any prior row at the same `(device_id, timestamp)` pair
    /// (last-write-wins). Returns [`Error::Write`] on engine failure; the
    /// caller decides the next step, no retry is built in.
    pub fn insert(&mut self, reading: &Reading) -> Result<()> {
        if reading.device_id.is_empty() {
            return Err(Error::InvalidArgument(
                "device_id must be non-empty".to_string(),
            ));
        }

        self.stmt
            .execute(rusqlite::params![
                reading.device_id,
                reading.timestamp_millis(),
                reading.sensor_type.as_str(),
                reading.sensor_value,
            ])
            .map_err(Error::Write)?;

        Ok(())
    }
}

// Write path
impl Store {
    /// Compile the insert statement for a table.
    ///
    /// Fails with [`Error::Schema`] when the table does not exist.
    pub fn prepare_insert(&self, table: &TableRef) -> Result<InsertHandle<'_>> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (device_id, timestamp, sensor_type, sensor_value)
             VALUES (?1, ?2, ?3, ?4)",
            table.qualified()
        );

        let stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| Error::Schema(format!("failed to prepare insert for '{table}': {e}")))?;

        debug!("Prepared insert statement for '{}'", table);
        Ok(InsertHandle { stmt })
    }
}

// Read path
impl Store {
    /// The most recent readings for a device, newest first.
    ///
    /// Returns up to `limit` rows ordered by timestamp descending, and an
    /// empty vec (not an error) when the device has no data. A zero `limit`
    /// is rejected with [`Error::InvalidArgument`].
    pub fn recent_readings(
        &self,
        table: &TableRef,
        device_id: &str,
        limit: u32,
    ) -> Result<Vec<Reading>> {
        if limit == 0 {
            return Err(Error::InvalidArgument(
                "limit must be a positive integer".to_string(),
            ));
        }
        if device_id.is_empty() {
            return Err(Error::InvalidArgument(
                "device_id must be non-empty".to_string(),
            ));
        }

        let sql = format!(
            "SELECT device_id, timestamp, sensor_type, sensor_value
             FROM {} WHERE device_id = ?1 ORDER BY timestamp DESC LIMIT ?2",
            table.qualified()
        );

        let mut stmt = self.conn.prepare(&sql).map_err(Error::Query)?;
        let readings = stmt
            .query_map(rusqlite::params![device_id, limit], row_to_reading)
            .map_err(Error::Query)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::Query)?;

        Ok(readings)
    }

    /// The latest reading for a device, if any.
    pub fn latest_reading(&self, table: &TableRef, device_id: &str) -> Result<Option<Reading>> {
        let mut readings = self.recent_readings(table, device_id, 1)?;
        Ok(readings.pop())
    }

    /// Mean `sensor_value` over every stored row matching the device and
    /// sensor type, rounded to 2 decimal places.
    ///
    /// Returns `Ok(None)` (not zero, not an error) when no rows match. The
    /// engine is only asked for the raw value scan; the mean is reduced
    /// client-side, so cost grows with the number of matching rows.
    pub fn average_value(
        &self,
        table: &TableRef,
        device_id: &str,
        sensor_type: &SensorType,
    ) -> Result<Option<f64>> {
        if device_id.is_empty() {
            return Err(Error::InvalidArgument(
                "device_id must be non-empty".to_string(),
            ));
        }

        let sql = format!(
            "SELECT sensor_value FROM {} WHERE device_id = ?1 AND sensor_type = ?2",
            table.qualified()
        );

        let mut stmt = self.conn.prepare(&sql).map_err(Error::Query)?;
        let values = stmt
            .query_map(
                rusqlite::params![device_id, sensor_type.as_str()],
                |row| row.get::<_, f64>(0),
            )
            .map_err(Error::Query)?
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(Error::Query)?;

        if values.is_empty() {
            return Ok(None);
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Ok(Some((mean * 100.0).round() / 100.0))
    }
}

// Catalog operations
impl Store {
    /// Distinct device identifiers present in the table, sorted ascending.
    ///
    /// Empty vec when the table holds no readings. Cost is proportional to
    /// the number of partitions, not the number of rows.
    pub fn list_devices(&self, table: &TableRef) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT device_id FROM {} ORDER BY device_id ASC",
            table.qualified()
        );

        let mut stmt = self.conn.prepare(&sql).map_err(Error::Query)?;
        let devices = stmt
            .query_map([], |row| row.get(0))
            .map_err(Error::Query)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(Error::Query)?;

        Ok(devices)
    }

    /// Count stored readings, optionally restricted to one device.
    pub fn count_readings(&self, table: &TableRef, device_id: Option<&str>) -> Result<u64> {
        let count: i64 = match device_id {
            Some(id) => self
                .conn
                .query_row(
                    &format!(
                        "SELECT COUNT(*) FROM {} WHERE device_id = ?1",
                        table.qualified()
                    ),
                    [id],
                    |row| row.get(0),
                )
                .map_err(Error::Query)?,
            None => self
                .conn
                .query_row(
                    &format!("SELECT COUNT(*) FROM {}", table.qualified()),
                    [],
                    |row| row.get(0),
                )
                .map_err(Error::Query)?,
        };

        Ok(count as u64)
    }
}

fn row_to_reading(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reading> {
    let millis: i64 = row.get(1)?;
    let timestamp = timestamp_from_millis(millis).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Integer, Box::new(e))
    })?;
    let sensor_type: String = row.get(2)?;

    Ok(Reading {
        device_id: row.get(0)?,
        timestamp,
        sensor_type: SensorType::from(sensor_type.as_str()),
        sensor_value: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_KEYSPACE, DEFAULT_TABLE};

    fn test_store() -> (Store, TableRef) {
        let store = Store::open_in_memory().unwrap();
        store.ensure_keyspace(DEFAULT_KEYSPACE, 1).unwrap();
        let table = TableRef::new(DEFAULT_KEYSPACE, DEFAULT_TABLE).unwrap();
        store.ensure_table(&table).unwrap();
        (store, table)
    }

    fn reading(device_id: &str, millis: i64, sensor_type: SensorType, value: f64) -> Reading {
        Reading {
            device_id: device_id.to_string(),
            timestamp: timestamp_from_millis(millis).unwrap(),
            sensor_type,
            sensor_value: value,
        }
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("nested").join("data.db")).unwrap();
        store.ensure_keyspace("iot_data", 1).unwrap();
        let table = TableRef::new("iot_data", "sensor_readings").unwrap();
        store.ensure_table(&table).unwrap();
        assert!(store.list_devices(&table).unwrap().is_empty());
    }

    #[test]
    fn test_insert_then_recent_returns_reading() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 22.5))
            .unwrap();

        let rows = store.recent_readings(&table, "device_1", 10).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].device_id, "device_1");
        assert_eq!(rows[0].timestamp_millis(), 1_000);
        assert_eq!(rows[0].sensor_type, SensorType::Temperature);
        assert_eq!(rows[0].sensor_value, 22.5);
    }

    #[test]
    fn test_recent_returns_newest_row_first() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 22.5))
            .unwrap();
        insert
            .insert(&reading("device_1", 2_000, SensorType::Temperature, 24.0))
            .unwrap();

        let rows = store.recent_readings(&table, "device_1", 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp_millis(), 2_000);
        assert_eq!(rows[0].sensor_value, 24.0);
    }

    #[test]
    fn test_recent_respects_limit_and_ordering() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        // Out-of-order inserts; the clustering order should still hold.
        for millis in [3_000i64, 1_000, 5_000, 2_000, 4_000] {
            insert
                .insert(&reading(
                    "device_1",
                    millis,
                    SensorType::Humidity,
                    millis as f64,
                ))
                .unwrap();
        }

        let rows = store.recent_readings(&table, "device_1", 3).unwrap();
        assert_eq!(rows.len(), 3);
        for pair in rows.windows(2) {
            assert!(pair[0].timestamp_millis() >= pair[1].timestamp_millis());
        }
        assert_eq!(rows[0].timestamp_millis(), 5_000);
    }

    #[test]
    fn test_recent_unknown_device_is_empty_not_error() {
        let (store, table) = test_store();
        let rows = store.recent_readings(&table, "device_404", 10).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_recent_zero_limit_is_invalid_argument() {
        let (store, table) = test_store();
        let result = store.recent_readings(&table, "device_1", 0);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_insert_empty_device_id_is_invalid_argument() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        let mut bad = reading("device_1", 1_000, SensorType::Motion, 1.0);
        bad.device_id.clear();

        let result = insert.insert(&bad);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_last_write_wins_on_same_key() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 22.5))
            .unwrap();
        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 30.0))
            .unwrap();

        assert_eq!(store.count_readings(&table, Some("device_1")).unwrap(), 1);
        let rows = store.recent_readings(&table, "device_1", 1).unwrap();
        assert_eq!(rows[0].sensor_value, 30.0);
    }

    #[test]
    fn test_average_of_known_values() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        for (millis, value) in [(1_000i64, 10.0), (2_000, 20.0), (3_000, 30.0)] {
            insert
                .insert(&reading("device_1", millis, SensorType::Temperature, value))
                .unwrap();
        }

        let avg = store
            .average_value(&table, "device_1", &SensorType::Temperature)
            .unwrap();
        assert_eq!(avg, Some(20.0));
    }

    #[test]
    fn test_average_filters_by_device_and_type() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 20.0))
            .unwrap();
        insert
            .insert(&reading("device_1", 2_000, SensorType::Humidity, 80.0))
            .unwrap();
        insert
            .insert(&reading("device_2", 3_000, SensorType::Temperature, 35.0))
            .unwrap();

        let avg = store
            .average_value(&table, "device_1", &SensorType::Temperature)
            .unwrap();
        assert_eq!(avg, Some(20.0));
    }

    #[test]
    fn test_average_no_matching_rows_is_none() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 22.5))
            .unwrap();

        let avg = store
            .average_value(&table, "device_1", &SensorType::Motion)
            .unwrap();
        assert_eq!(avg, None);
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        for (millis, value) in [(1_000i64, 10.0), (2_000, 20.0), (3_000, 25.0)] {
            insert
                .insert(&reading("device_1", millis, SensorType::Humidity, value))
                .unwrap();
        }

        let avg = store
            .average_value(&table, "device_1", &SensorType::Humidity)
            .unwrap();
        assert_eq!(avg, Some(18.33));
    }

    #[test]
    fn test_list_devices_sorted_and_deduplicated() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        for (device, millis) in [
            ("device_3", 1_000i64),
            ("device_1", 2_000),
            ("device_2", 3_000),
            ("device_1", 4_000),
        ] {
            insert
                .insert(&reading(device, millis, SensorType::Motion, 0.0))
                .unwrap();
        }

        let devices = store.list_devices(&table).unwrap();
        assert_eq!(devices, vec!["device_1", "device_2", "device_3"]);
    }

    #[test]
    fn test_list_devices_empty_store() {
        let (store, table) = test_store();
        assert!(store.list_devices(&table).unwrap().is_empty());
    }

    #[test]
    fn test_count_readings() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 22.5))
            .unwrap();
        insert
            .insert(&reading("device_1", 2_000, SensorType::Humidity, 55.0))
            .unwrap();
        insert
            .insert(&reading("device_2", 3_000, SensorType::Motion, 1.0))
            .unwrap();

        assert_eq!(store.count_readings(&table, None).unwrap(), 3);
        assert_eq!(store.count_readings(&table, Some("device_1")).unwrap(), 2);
        assert_eq!(store.count_readings(&table, Some("device_9")).unwrap(), 0);
    }

    #[test]
    fn test_latest_reading() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        assert!(store.latest_reading(&table, "device_1").unwrap().is_none());

        insert
            .insert(&reading("device_1", 1_000, SensorType::Temperature, 22.5))
            .unwrap();
        insert
            .insert(&reading("device_1", 2_000, SensorType::Temperature, 24.0))
            .unwrap();

        let latest = store.latest_reading(&table, "device_1").unwrap().unwrap();
        assert_eq!(latest.timestamp_millis(), 2_000);
        assert_eq!(latest.sensor_value, 24.0);
    }

    #[test]
    fn test_prepare_insert_missing_table() {
        let store = Store::open_in_memory().unwrap();
        let table = TableRef::new("iot_data", "sensor_readings").unwrap();
        let result = store.prepare_insert(&table);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_custom_sensor_type_round_trips_through_store() {
        let (store, table) = test_store();
        let mut insert = store.prepare_insert(&table).unwrap();

        insert
            .insert(&reading(
                "device_1",
                1_000,
                SensorType::Other("co2".to_string()),
                415.0,
            ))
            .unwrap();

        let rows = store.recent_readings(&table, "device_1", 1).unwrap();
        assert_eq!(rows[0].sensor_type, SensorType::Other("co2".to_string()));
    }
}
