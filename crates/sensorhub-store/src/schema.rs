//! Keyspace and table management.
//!
//! Readings are laid out the way a wide-column time-series store keeps them:
//! one table per (keyspace, table) pair, primary-keyed by the partition
//! column `device_id` and the clustering column `timestamp` in descending
//! order, so the newest rows of a partition come back first without sorting.
//! Keyspaces are registered in a metadata table together with their
//! replication factor.

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Maximum length accepted for keyspace and table identifiers.
pub const MAX_IDENTIFIER_LEN: usize = 48;

/// A validated (keyspace, table) pair.
///
/// Constructing a `TableRef` validates both identifiers once; the cached
/// qualified name is then safe to interpolate into SQL. Build it once at
/// startup and pass it to every read and write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    keyspace: String,
    table: String,
    qualified: String,
}

impl TableRef {
    /// Validate the identifiers and build the table reference.
    pub fn new(keyspace: &str, table: &str) -> Result<Self> {
        validate_identifier(keyspace)?;
        validate_identifier(table)?;
        Ok(Self {
            keyspace: keyspace.to_string(),
            table: table.to_string(),
            qualified: format!("\"{keyspace}.{table}\""),
        })
    }

    /// The keyspace this table lives in.
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// The table name within the keyspace.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted `"keyspace.table"` name for SQL interpolation.
    pub(crate) fn qualified(&self) -> &str {
        &self.qualified
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.keyspace, self.table)
    }
}

/// Check that a name is a valid keyspace or table identifier.
///
/// Identifiers must start with an ASCII letter and contain only ASCII
/// letters, digits, and underscores, up to [`MAX_IDENTIFIER_LEN`] characters.
/// This is also the guard that makes interpolating qualified names into SQL
/// safe.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LEN {
        return Err(Error::Schema(format!(
            "identifier '{name}' must be 1-{MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(Error::Schema(format!(
            "identifier '{name}' must start with a letter"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(Error::Schema(format!(
            "identifier '{name}' may only contain letters, digits, and underscores"
        )));
    }
    Ok(())
}

/// Register a keyspace if it does not already exist.
///
/// Idempotent: re-registering an existing keyspace is a no-op, even with a
/// different replication factor (the first registration wins; changing
/// replication after creation is a migration concern and out of scope).
pub fn ensure_keyspace(conn: &Connection, name: &str, replication_factor: u32) -> Result<()> {
    if replication_factor < 1 {
        return Err(Error::Schema(format!(
            "replication factor must be at least 1, got {replication_factor}"
        )));
    }
    validate_identifier(name)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS keyspaces (
            name TEXT PRIMARY KEY,
            replication_factor INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| Error::Schema(format!("failed to create keyspace registry: {e}")))?;

    let inserted = conn
        .execute(
            "INSERT INTO keyspaces (name, replication_factor) VALUES (?1, ?2)
             ON CONFLICT(name) DO NOTHING",
            rusqlite::params![name, replication_factor],
        )
        .map_err(|e| Error::Schema(format!("failed to register keyspace '{name}': {e}")))?;

    if inserted > 0 {
        info!(
            "Created keyspace '{}' with replication factor {}",
            name, replication_factor
        );
    } else {
        debug!("Keyspace '{}' already exists", name);
    }

    Ok(())
}

/// Check whether a keyspace has been registered.
pub fn keyspace_exists(conn: &Connection, name: &str) -> Result<bool> {
    let registry_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'keyspaces'",
            [],
            |row| row.get(0),
        )
        .map_err(|e| Error::Schema(format!("failed to check keyspace registry: {e}")))?;

    if !registry_exists {
        return Ok(false);
    }

    let found = conn
        .query_row(
            "SELECT 1 FROM keyspaces WHERE name = ?1",
            [name],
            |_row| Ok(()),
        )
        .optional()
        .map_err(|e| Error::Schema(format!("failed to look up keyspace '{name}': {e}")))?;

    Ok(found.is_some())
}

/// Create the readings table if it does not already exist.
///
/// The table is keyed `(device_id, timestamp DESC)`: all rows for one device
/// form a partition, ordered newest-first. Idempotent; a table that already
/// exists with a different shape is left untouched (no migration support).
pub fn ensure_table(conn: &Connection, table: &TableRef) -> Result<()> {
    if !keyspace_exists(conn, table.keyspace())? {
        return Err(Error::Schema(format!(
            "keyspace '{}' does not exist",
            table.keyspace()
        )));
    }

    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS {} (
            device_id TEXT NOT NULL,
            timestamp INTEGER NOT NULL,
            sensor_type TEXT NOT NULL,
            sensor_value REAL NOT NULL,
            PRIMARY KEY (device_id, timestamp DESC)
        ) WITHOUT ROWID",
        table.qualified()
    );

    conn.execute(&ddl, [])
        .map_err(|e| Error::Schema(format!("failed to create table '{table}': {e}")))?;

    debug!("Ensured table '{}'", table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_tables(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_identifier_accepts_typical_names() {
        assert!(validate_identifier("iot_data").is_ok());
        assert!(validate_identifier("sensor_readings").is_ok());
        assert!(validate_identifier("t2").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_malformed_names() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("9lives").is_err());
        assert!(validate_identifier("bad-name").is_err());
        assert!(validate_identifier("has space").is_err());
        assert!(validate_identifier("semi;colon").is_err());
        assert!(validate_identifier(&"x".repeat(MAX_IDENTIFIER_LEN + 1)).is_err());
    }

    #[test]
    fn test_ensure_keyspace_rejects_zero_replication() {
        let conn = Connection::open_in_memory().unwrap();
        let result = ensure_keyspace(&conn, "iot_data", 0);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_ensure_keyspace_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_keyspace(&conn, "iot_data", 1).unwrap();
        ensure_keyspace(&conn, "iot_data", 1).unwrap();

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM keyspaces", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_ensure_keyspace_first_registration_wins() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_keyspace(&conn, "iot_data", 1).unwrap();
        ensure_keyspace(&conn, "iot_data", 3).unwrap();

        let rf: i64 = conn
            .query_row(
                "SELECT replication_factor FROM keyspaces WHERE name = 'iot_data'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(rf, 1);
    }

    #[test]
    fn test_ensure_table_requires_keyspace() {
        let conn = Connection::open_in_memory().unwrap();
        let table = TableRef::new("iot_data", "sensor_readings").unwrap();
        let result = ensure_table(&conn, &table);
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_ensure_table_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        let table = TableRef::new("iot_data", "sensor_readings").unwrap();

        ensure_keyspace(&conn, "iot_data", 1).unwrap();
        ensure_table(&conn, &table).unwrap();
        let tables_after_first = count_tables(&conn);

        ensure_table(&conn, &table).unwrap();
        assert_eq!(count_tables(&conn), tables_after_first);
    }

    #[test]
    fn test_table_ref_rejects_malformed_identifiers() {
        assert!(TableRef::new("iot_data", "drop table").is_err());
        assert!(TableRef::new("", "sensor_readings").is_err());
    }

    #[test]
    fn test_table_ref_qualified_name() {
        let table = TableRef::new("iot_data", "sensor_readings").unwrap();
        assert_eq!(table.qualified(), "\"iot_data.sensor_readings\"");
        assert_eq!(table.to_string(), "iot_data.sensor_readings");
    }
}
