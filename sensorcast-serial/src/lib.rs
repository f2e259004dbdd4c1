//! sensorcast-serial
//!
//! Ingestion for the ESP32 soil-monitoring panel: parse serial-monitor
//! captures, derive readings files and SQL seed scripts from them, and serve
//! readings files back to the pipeline through a `SampleSource`.
#![warn(missing_docs)]

/// Serial-monitor parsing and synthetic temperature.
pub mod log;
/// Readings files.
pub mod readings;
/// SQL seed scripts.
pub mod seed;
/// CSV-backed sample source.
pub mod source;

pub use log::{HEADER_NAMES, SerialRow, derive_temperature, draw_noise, parse_serial_log};
pub use readings::{Reading, ReadingsPlan, TS_FORMAT, write_readings_csv};
pub use seed::{SeedTargets, write_sql_seed};
pub use source::CsvSource;
