#![allow(dead_code)]

use std::sync::Arc;

use sensorcast::{SampleSource, TimeWindow};
use tracing_subscriber::EnvFilter;

/// Load `.env` and install a fmt subscriber driven by `RUST_LOG`.
pub fn init() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

fn use_mock() -> bool {
    std::env::var("SENSORCAST_EXAMPLES_USE_MOCK").is_ok()
}

#[must_use]
pub fn get_source() -> Arc<dyn SampleSource> {
    if use_mock() {
        println!("--- (Using Mock Source for CI) ---");
        Arc::new(sensorcast_mock::MockSource::new())
    } else {
        let path = std::env::var("SENSORCAST_READINGS_CSV")
            .unwrap_or_else(|_| "data/readings.csv".to_string());
        Arc::new(sensorcast_serial::CsvSource::readings(path, 1, 2))
    }
}

/// Full history for the mock, otherwise the trailing `SENSORCAST_WINDOW_MINUTES` if set.
#[must_use]
pub fn window() -> TimeWindow {
    if use_mock() {
        return TimeWindow::all();
    }
    std::env::var("SENSORCAST_WINDOW_MINUTES")
        .ok()
        .and_then(|m| m.parse::<i64>().ok())
        .filter(|m| *m > 0)
        .map_or_else(TimeWindow::all, |m| {
            TimeWindow::trailing(chrono::Utc::now(), m)
        })
}
