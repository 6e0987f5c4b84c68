//! sensorhub - query and analyze stored sensor readings.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod format;

use cli::{Cli, Commands};
use sensorhub_store::{Store, TableRef};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sensorhub=debug,sensorhub_store=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = match &cli.database {
        Some(path) => Store::open(path)?,
        None => Store::open_default()?,
    };
    let table = TableRef::new(&cli.keyspace, &cli.table)?;

    match cli.command {
        Commands::Devices { format } => commands::cmd_devices(&store, &table, format),
        Commands::Recent {
            device,
            limit,
            sensor,
            format,
        } => commands::cmd_recent(&store, &table, &device, limit, sensor.as_deref(), format),
        Commands::Average {
            device,
            sensor,
            format,
        } => commands::cmd_average(&store, &table, &device, &sensor, format),
        Commands::Summary { format } => commands::cmd_summary(&store, &table, format),
    }
}
