// Shared fixtures for orchestrator tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sensorcast::{RawSample, SampleSource, Sensorcast, SensorcastBuilder, StreamSpec};
use sensorcast_mock::MockSource;

pub const TEMP: u32 = 1;
pub const HUMIDITY: u32 = 2;
pub const PH_ODD: u32 = 3;
pub const MOISTURE_EVEN: u32 = 4;
pub const BLANK: u32 = 5;
pub const FAILING: u32 = 98;
pub const SLOW: u32 = 99;

/// Construct a UTC `DateTime` from components for readability in tests.
pub fn dt(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, hh, mm, ss).unwrap()
}

/// One numeric sample per `step`, starting at `start`.
pub fn samples(start: DateTime<Utc>, step: TimeDelta, values: &[f64]) -> Vec<RawSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| RawSample::new(start + step * i32::try_from(i).unwrap(), v))
        .collect()
}

pub fn mock() -> Arc<dyn SampleSource> {
    Arc::new(MockSource::new())
}

pub fn builder(target: u32, aux: u32) -> SensorcastBuilder {
    Sensorcast::builder()
        .target(StreamSpec::new(target, "TEMP"))
        .auxiliary(StreamSpec::new(aux, "AUX"))
        .source_timeout(Duration::from_secs(2))
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
