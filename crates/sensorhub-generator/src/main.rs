//! sensorhub generator - continuous synthetic sensor data.
//!
//! Run with: `cargo run -p sensorhub-generator`

use std::path::PathBuf;

use clap::Parser;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sensorhub_generator::{Config, synth};
use sensorhub_store::{Store, TableRef};
use sensorhub_types::Reading;

/// Continuous synthetic sensor data generator.
#[derive(Parser, Debug)]
#[command(name = "sensorhub-generator")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database path (overrides config).
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Device id to simulate (repeatable; overrides config).
    #[arg(long = "device")]
    devices: Vec<String>,

    /// Stop after this many sweeps (runs until interrupted by default).
    #[arg(long)]
    sweeps: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sensorhub_generator=info".parse()?)
                .add_directive("sensorhub_store=info".parse()?),
        )
        .init();

    // Load configuration, then apply CLI overrides.
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };
    if let Some(database) = args.database {
        config.storage.path = database;
    }
    if !args.devices.is_empty() {
        config.generator.devices = args.devices;
    }
    config.validate()?;

    let store = Store::open(&config.storage.path)?;
    store.ensure_keyspace(&config.schema.keyspace, config.schema.replication_factor)?;
    let table = TableRef::new(&config.schema.keyspace, &config.schema.table)?;
    store.ensure_table(&table)?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            signal_cancel.cancel();
        }
    });

    let total = run(&store, &table, &config, &cancel, args.sweeps).await?;
    info!("Generator stopped; {} readings inserted", total);

    Ok(())
}

/// Sweep the device fleet until cancelled or the requested sweep count is
/// reached.
///
/// One timestamp is captured per sweep and shared by every device's reading
/// in that sweep. A failed insert is logged and skipped; there is no retry.
async fn run(
    store: &Store,
    table: &TableRef,
    config: &Config,
    cancel: &CancellationToken,
    max_sweeps: Option<u64>,
) -> anyhow::Result<u64> {
    let mut insert = store.prepare_insert(table)?;
    let mut rng = rand::rng();
    let mut total = 0u64;
    let mut sweeps = 0u64;

    info!(
        "Simulating {} device(s), sweep interval {:.1}-{:.1}s",
        config.generator.devices.len(),
        config.generator.interval_min_secs,
        config.generator.interval_max_secs,
    );

    while !cancel.is_cancelled() {
        let timestamp = OffsetDateTime::now_utc();

        for device_id in &config.generator.devices {
            let (sensor_type, sensor_value) = synth::sample_observation(&mut rng);
            let reading = Reading {
                device_id: device_id.clone(),
                timestamp,
                sensor_type,
                sensor_value,
            };

            match insert.insert(&reading) {
                Ok(()) => {
                    total += 1;
                    info!(
                        "{} | {} = {}",
                        reading.device_id, reading.sensor_type, reading.sensor_value
                    );
                }
                Err(e) => {
                    warn!("Failed to insert reading for {}: {}", device_id, e);
                }
            }
        }

        sweeps += 1;
        if let Some(max) = max_sweeps
            && sweeps >= max
        {
            break;
        }

        let delay = synth::sweep_delay(
            &mut rng,
            config.generator.interval_min_secs,
            config.generator.interval_max_secs,
        );
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    Ok(total)
}
