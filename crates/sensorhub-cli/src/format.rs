//! Output formatting for readings and summaries.

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use sensorhub_types::{Reading, SensorType};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(timestamp: &OffsetDateTime) -> String {
    timestamp
        .format(&TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Render a sensor value with its conventional unit.
pub fn value_with_unit(value: f64, sensor_type: &SensorType) -> String {
    match sensor_type {
        SensorType::Temperature => format!("{value:.2}\u{00b0}C"),
        SensorType::Humidity => format!("{value:.2}%"),
        SensorType::Motion => {
            if value >= 0.5 {
                "Motion".to_string()
            } else {
                "No motion".to_string()
            }
        }
        _ => format!("{value:.2}"),
    }
}

/// Unit suffix for aggregate values (motion averages stay unitless).
pub fn unit_suffix(sensor_type: &SensorType) -> &'static str {
    match sensor_type {
        SensorType::Temperature => "\u{00b0}C",
        SensorType::Humidity => "%",
        _ => "",
    }
}

/// Render readings as a fixed-width text table, newest first.
pub fn readings_table(readings: &[Reading]) -> String {
    if readings.is_empty() {
        return "No readings found.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<20} {:<12} {:>12}\n",
        "DEVICE", "TIMESTAMP", "TYPE", "VALUE"
    ));
    for reading in readings {
        out.push_str(&format!(
            "{:<12} {:<20} {:<12} {:>12}\n",
            reading.device_id,
            format_timestamp(&reading.timestamp),
            reading.sensor_type.to_string(),
            value_with_unit(reading.sensor_value, &reading.sensor_type),
        ));
    }
    out
}
