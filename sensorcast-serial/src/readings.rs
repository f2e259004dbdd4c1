use std::io::Write;

use chrono::{NaiveDateTime, TimeDelta};
use rand::Rng;
use sensorcast_core::SensorcastError;

use crate::log::{SerialRow, derive_temperature, draw_noise};

/// Timestamp format used in readings files and SQL seeds.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of a readings file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Wall-clock timestamp (no zone; the capture is local time).
    pub ts: NaiveDateTime,
    /// Synthetic temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
}

/// How timestamps are assigned to serial rows, which carry none of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingsPlan {
    /// Timestamp of the first row.
    pub start: NaiveDateTime,
    /// Spacing between consecutive rows.
    pub interval: TimeDelta,
}

impl ReadingsPlan {
    /// Default spacing between serial rows.
    pub const DEFAULT_INTERVAL: TimeDelta = TimeDelta::seconds(120);

    /// Start at `start` with the default interval.
    #[must_use]
    pub const fn starting_at(start: NaiveDateTime) -> Self {
        Self {
            start,
            interval: Self::DEFAULT_INTERVAL,
        }
    }

    /// Place `rows` rows so that the series ends `interval` before `end`.
    #[must_use]
    pub fn ending_at(end: NaiveDateTime, interval: TimeDelta, rows: usize) -> Self {
        let n = i32::try_from(rows).unwrap_or(i32::MAX);
        Self {
            start: end - interval * n,
            interval,
        }
    }

    /// Turn serial rows into readings, drawing temperature noise from `rng`.
    pub fn readings<R: Rng + ?Sized>(&self, rows: &[SerialRow], rng: &mut R) -> Vec<Reading> {
        let mut ts = self.start;
        rows.iter()
            .map(|row| {
                let reading = Reading {
                    ts,
                    temperature: derive_temperature(row.ph, row.humidity, draw_noise(rng)),
                    humidity: row.humidity,
                };
                ts += self.interval;
                reading
            })
            .collect()
    }
}

pub(crate) fn csv_error(e: csv::Error) -> SensorcastError {
    if e.is_io_error() {
        SensorcastError::Io(e.to_string())
    } else {
        SensorcastError::Data(e.to_string())
    }
}

/// Write readings as `ts,temperature,humidity` with two-decimal values.
///
/// # Errors
/// Returns `Io` when the writer fails.
pub fn write_readings_csv<W: Write>(writer: W, readings: &[Reading]) -> Result<(), SensorcastError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["ts", "temperature", "humidity"])
        .map_err(csv_error)?;
    for r in readings {
        wtr.write_record([
            r.ts.format(TS_FORMAT).to_string(),
            format!("{:.2}", r.temperature),
            format!("{:.2}", r.humidity),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}
