//! Generator configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Generator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings.
    pub storage: StorageConfig,
    /// Keyspace/table settings.
    pub schema: SchemaConfig,
    /// Simulation settings.
    pub generator: GeneratorConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Keyspace and table names are valid identifiers
    /// - Replication factor is at least 1
    /// - At least one device is configured, with non-empty unique ids
    /// - Sweep interval bounds are positive and ordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        errors.extend(self.schema.validate());
        errors.extend(self.generator.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: sensorhub_store::default_db_path(),
        }
    }
}

/// Keyspace/table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Keyspace holding the readings table.
    pub keyspace: String,
    /// Readings table name.
    pub table: String,
    /// Replication factor used when the keyspace is first created.
    pub replication_factor: u32,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            keyspace: sensorhub_store::DEFAULT_KEYSPACE.to_string(),
            table: sensorhub_store::DEFAULT_TABLE.to_string(),
            replication_factor: sensorhub_store::DEFAULT_REPLICATION_FACTOR,
        }
    }
}

impl SchemaConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Err(e) = sensorhub_store::validate_identifier(&self.keyspace) {
            errors.push(ValidationError {
                field: "schema.keyspace".to_string(),
                message: e.to_string(),
            });
        }
        if let Err(e) = sensorhub_store::validate_identifier(&self.table) {
            errors.push(ValidationError {
                field: "schema.table".to_string(),
                message: e.to_string(),
            });
        }
        if self.replication_factor < 1 {
            errors.push(ValidationError {
                field: "schema.replication_factor".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        errors
    }
}

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Devices to simulate.
    pub devices: Vec<String>,
    /// Lower bound of the sweep sleep, in seconds.
    pub interval_min_secs: f64,
    /// Upper bound of the sweep sleep, in seconds.
    pub interval_max_secs: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            devices: vec![
                "device_1".to_string(),
                "device_2".to_string(),
                "device_3".to_string(),
            ],
            interval_min_secs: 2.0,
            interval_max_secs: 3.0,
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.devices.is_empty() {
            errors.push(ValidationError {
                field: "generator.devices".to_string(),
                message: "at least one device must be configured".to_string(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for (i, device) in self.devices.iter().enumerate() {
            if device.is_empty() {
                errors.push(ValidationError {
                    field: format!("generator.devices[{i}]"),
                    message: "device id cannot be empty".to_string(),
                });
            } else if !seen.insert(device.as_str()) {
                errors.push(ValidationError {
                    field: format!("generator.devices[{i}]"),
                    message: format!("duplicate device id '{device}'"),
                });
            }
        }

        if self.interval_min_secs <= 0.0 {
            errors.push(ValidationError {
                field: "generator.interval_min_secs".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.interval_max_secs < self.interval_min_secs {
            errors.push(ValidationError {
                field: "generator.interval_max_secs".to_string(),
                message: "must be at least interval_min_secs".to_string(),
            });
        }

        errors
    }
}

/// Default configuration path: `<config dir>/sensorhub/generator.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sensorhub")
        .join("generator.toml")
}

/// A single configuration validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse the config file.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// One or more fields failed validation.
    #[error("Invalid configuration: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Validation(Vec<ValidationError>),
}
