//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Query and analyze stored sensor readings.
#[derive(Parser, Debug)]
#[command(name = "sensorhub")]
#[command(version, about = "Query and analyze stored sensor readings", long_about = None)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true, env = "SENSORHUB_DB")]
    pub database: Option<PathBuf>,

    /// Keyspace holding the readings table
    #[arg(long, global = true, default_value = sensorhub_store::DEFAULT_KEYSPACE)]
    pub keyspace: String,

    /// Readings table name
    #[arg(long, global = true, default_value = sensorhub_store::DEFAULT_TABLE)]
    pub table: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List devices that have stored readings
    Devices {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the most recent readings for a device
    Recent {
        /// Device identifier
        #[arg(short, long)]
        device: String,

        /// Number of readings to retrieve
        #[arg(short, long, default_value = "10")]
        limit: u32,

        /// Only show readings of this sensor type
        #[arg(short, long)]
        sensor: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Average value for a device and sensor type
    Average {
        /// Device identifier
        #[arg(short, long)]
        device: String,

        /// Sensor type (temperature, humidity, motion, ...)
        #[arg(short, long)]
        sensor: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Per-device overview: reading counts and latest values
    Summary {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}
