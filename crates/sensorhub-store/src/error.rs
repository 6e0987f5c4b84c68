//! Error types for sensorhub-store.

use std::path::PathBuf;

/// Result type for sensorhub-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sensorhub-store.
///
/// Variants say where an operation failed, so callers can tell a failed read
/// apart from a read that legitimately matched no rows: reads return
/// `Ok(empty)` / `Ok(None)` only when the engine answered with zero rows.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The storage engine could not be opened or reached. Fatal to the
    /// calling process.
    #[error("Connection error: {0}")]
    Connection(#[source] rusqlite::Error),

    /// Keyspace or table creation/validation failed. Fatal at startup.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A caller-supplied parameter is out of contract.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A single insert failed. Non-fatal: the caller decides the next step;
    /// no retry is built in.
    #[error("Write failed: {0}")]
    Write(#[source] rusqlite::Error),

    /// A read failed.
    #[error("Query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// Failed to create the database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}
