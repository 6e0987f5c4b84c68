//! Command implementations for the CLI.

use anyhow::Result;
use serde::Serialize;

use sensorhub_store::{Store, TableRef};
use sensorhub_types::{Reading, SensorType};

use crate::cli::OutputFormat;
use crate::format;

/// List devices that have stored readings.
pub fn cmd_devices(store: &Store, table: &TableRef, format: OutputFormat) -> Result<()> {
    let devices = store.list_devices(table)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&devices)?),
        OutputFormat::Text => {
            if devices.is_empty() {
                println!("No devices found.");
            } else {
                for device in &devices {
                    println!("{device}");
                }
            }
        }
    }

    Ok(())
}

/// Show the most recent readings for a device, newest first.
///
/// The sensor filter is applied client-side after the fetch, so a filtered
/// listing may show fewer than `limit` rows.
pub fn cmd_recent(
    store: &Store,
    table: &TableRef,
    device: &str,
    limit: u32,
    sensor: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let mut readings = store.recent_readings(table, device, limit)?;
    if let Some(sensor) = sensor {
        let sensor_type = SensorType::from(sensor.to_lowercase().as_str());
        readings.retain(|r| r.sensor_type == sensor_type);
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&readings)?),
        OutputFormat::Text => print!("{}", format::readings_table(&readings)),
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct AverageReport<'a> {
    device_id: &'a str,
    sensor_type: SensorType,
    average: Option<f64>,
}

/// Average value for a device and sensor type, over all stored readings.
pub fn cmd_average(
    store: &Store,
    table: &TableRef,
    device: &str,
    sensor: &str,
    format: OutputFormat,
) -> Result<()> {
    let sensor_type = SensorType::from(sensor.to_lowercase().as_str());
    let average = store.average_value(table, device, &sensor_type)?;

    match format {
        OutputFormat::Json => {
            let report = AverageReport {
                device_id: device,
                sensor_type,
                average,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => match average {
            Some(value) => println!(
                "Average {} for {}: {:.2}{}",
                sensor_type,
                device,
                value,
                format::unit_suffix(&sensor_type)
            ),
            None => println!("No {sensor_type} readings found for {device}."),
        },
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    device_id: String,
    readings: u64,
    latest: Option<Reading>,
}

/// Per-device overview: reading counts and latest values.
pub fn cmd_summary(store: &Store, table: &TableRef, format: OutputFormat) -> Result<()> {
    let devices = store.list_devices(table)?;

    let mut rows = Vec::with_capacity(devices.len());
    for device_id in devices {
        let readings = store.count_readings(table, Some(&device_id))?;
        let latest = store.latest_reading(table, &device_id)?;
        rows.push(SummaryRow {
            device_id,
            readings,
            latest,
        });
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No devices found.");
                return Ok(());
            }

            println!(
                "{:<12} {:>9}  {:<20} {:<12} {:>12}",
                "DEVICE", "READINGS", "LAST SEEN", "TYPE", "VALUE"
            );
            let mut total = 0u64;
            for row in &rows {
                total += row.readings;
                match &row.latest {
                    Some(latest) => println!(
                        "{:<12} {:>9}  {:<20} {:<12} {:>12}",
                        row.device_id,
                        row.readings,
                        format::format_timestamp(&latest.timestamp),
                        latest.sensor_type.to_string(),
                        format::value_with_unit(latest.sensor_value, &latest.sensor_type),
                    ),
                    None => println!("{:<12} {:>9}", row.device_id, row.readings),
                }
            }
            println!("Total readings: {total}");
        }
    }

    Ok(())
}
