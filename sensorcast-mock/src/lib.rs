use async_trait::async_trait;
use sensorcast_core::{RawSample, SampleSource, SensorcastError, StreamSpec, TimeWindow};

mod fixtures;

pub use fixtures::streams::origin as fixture_origin;

/// Mock source for CI-safe examples. Provides deterministic data from static fixtures.
///
/// Sensor ids with fixtures:
/// - `1`: temperature, every 30s, comma decimals
/// - `2`: humidity, every minute at :40
/// - `3`/`4`: odd/even-minute streams that only pair through the tolerance join
/// - `5`: a stream whose values are all unusable
///
/// Sensor `98` always fails and sensor `99` sleeps before answering, so
/// orchestrator timeouts can be exercised.
pub struct MockSource;

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn not_found(what: &str) -> SensorcastError {
        SensorcastError::not_found(what.to_string())
    }

    async fn maybe_fail_or_timeout(sensor_id: u32) -> Result<(), SensorcastError> {
        match sensor_id {
            98 => Err(SensorcastError::source(
                "sensorcast-mock",
                format!("forced failure for sensor {sensor_id}"),
            )),
            99 => {
                // Keep short to avoid slowing tests excessively
                tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SampleSource for MockSource {
    fn name(&self) -> &'static str {
        "sensorcast-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    async fn fetch(
        &self,
        stream: &StreamSpec,
        window: &TimeWindow,
    ) -> Result<Vec<RawSample>, SensorcastError> {
        Self::maybe_fail_or_timeout(stream.sensor_id).await?;
        let samples = fixtures::streams::by_sensor(stream.sensor_id)
            .ok_or_else(|| Self::not_found(&format!("samples for {stream}")))?;
        Ok(samples.into_iter().filter(|s| window.contains(s.ts)).collect())
    }
}

mod dynamic;
pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};
