use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use sensorcast_core::{RawSample, RawValue, SampleSource, SensorcastError, StreamSpec, TimeWindow};

use crate::readings::{TS_FORMAT, csv_error};

/// A `SampleSource` over a readings CSV file.
///
/// Each sensor id is mapped to one column by name. Cell text is passed through
/// untouched so that comma decimals reach the normalization step; an empty
/// cell becomes a missing value. Timestamps are read as wall-clock time in a
/// fixed offset (UTC by default).
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    columns: HashMap<u32, String>,
    ts_column: String,
    offset: FixedOffset,
}

impl CsvSource {
    /// Static source name used in error tagging.
    pub const NAME: &'static str = "sensorcast-csv";

    /// Source with no column mappings; add them with [`CsvSource::with_column`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            columns: HashMap::new(),
            ts_column: "ts".to_string(),
            offset: Utc.fix(),
        }
    }

    /// Source over a file written by `write_readings_csv`, using the seed sensor ids.
    pub fn readings(path: impl Into<PathBuf>, temperature_sensor: u32, humidity_sensor: u32) -> Self {
        Self::new(path)
            .with_column(temperature_sensor, "temperature")
            .with_column(humidity_sensor, "humidity")
    }

    /// Serve `sensor_id` from column `column`.
    #[must_use]
    pub fn with_column(mut self, sensor_id: u32, column: impl Into<String>) -> Self {
        self.columns.insert(sensor_id, column.into());
        self
    }

    /// Name of the timestamp column (default `ts`).
    #[must_use]
    pub fn with_ts_column(mut self, column: impl Into<String>) -> Self {
        self.ts_column = column.into();
        self
    }

    /// Interpret timestamps as local time at this offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// File this source reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse_ts(&self, text: &str) -> Result<DateTime<Utc>, SensorcastError> {
        let naive = NaiveDateTime::parse_from_str(text.trim(), TS_FORMAT)
            .map_err(|e| SensorcastError::Data(format!("bad timestamp {text:?}: {e}")))?;
        self.offset
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| SensorcastError::Data(format!("unrepresentable timestamp {text:?}")))
    }

    /// Parse CSV text for one column, keeping rows inside `window`.
    ///
    /// # Errors
    /// Returns `Data` for a missing column or malformed timestamp.
    pub fn parse(
        &self,
        text: &str,
        column: &str,
        window: &TimeWindow,
    ) -> Result<Vec<RawSample>, SensorcastError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        let headers = reader.headers().map_err(csv_error)?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| SensorcastError::Data(format!("missing column {name:?}")))
        };
        let ts_idx = find(&self.ts_column)?;
        let value_idx = find(column)?;

        let mut out = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let Some(ts_text) = record.get(ts_idx) else {
                continue;
            };
            let ts = self.parse_ts(ts_text)?;
            if !window.contains(ts) {
                continue;
            }
            let value = match record.get(value_idx) {
                Some(v) if !v.is_empty() => RawValue::Text(v.to_string()),
                _ => RawValue::Missing,
            };
            out.push(RawSample { ts, value });
        }
        Ok(out)
    }
}

#[async_trait]
impl SampleSource for CsvSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn vendor(&self) -> &'static str {
        "CSV file"
    }

    async fn fetch(
        &self,
        stream: &StreamSpec,
        window: &TimeWindow,
    ) -> Result<Vec<RawSample>, SensorcastError> {
        let column = self
            .columns
            .get(&stream.sensor_id)
            .ok_or_else(|| SensorcastError::not_found(format!("column for {stream}")))?;
        let text = tokio::fs::read_to_string(&self.path).await?;
        let samples = self.parse(&text, column, window)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %self.path.display(),
            column = column.as_str(),
            samples = samples.len(),
            "read csv stream"
        );

        Ok(samples)
    }
}
