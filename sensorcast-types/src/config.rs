//! Configuration types shared across the pipeline, sources, and orchestrator.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::SensorcastError;
use crate::stream::StreamSpec;
use serde::{Deserialize, Serialize};

/// Direction used by the tolerance-bounded fallback join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinDirection {
    /// Attach the closest auxiliary bucket on either side; ties pick the earlier one.
    #[default]
    Nearest,
    /// Attach the latest auxiliary bucket at or before the target bucket.
    Backward,
    /// Attach the earliest auxiliary bucket at or after the target bucket.
    Forward,
}

/// Bucket granularity for the resampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucketing {
    /// Width of each bucket in whole minutes (>= 1).
    pub minutes: i64,
    /// Optional fixed offset (seconds east of UTC) applied before truncation,
    /// so that multi-minute buckets line up with local wall-clock boundaries.
    pub utc_offset_seconds: Option<i64>,
}

impl Default for Bucketing {
    fn default() -> Self {
        Self {
            minutes: 1,
            utc_offset_seconds: None,
        }
    }
}

impl Bucketing {
    /// Widest bucket accepted by [`PipelineConfig::validate`]: one week.
    pub const MAX_MINUTES: i64 = 7 * 24 * 60;

    /// Largest offset magnitude accepted by [`PipelineConfig::validate`], exclusive.
    pub const MAX_OFFSET_SECONDS: i64 = 24 * 3600;

    /// Minute buckets without any offset.
    #[must_use]
    pub const fn minutes(minutes: i64) -> Self {
        Self {
            minutes,
            utc_offset_seconds: None,
        }
    }

    /// Bucket width in seconds, saturating for out-of-range widths.
    #[must_use]
    pub const fn step_seconds(&self) -> i64 {
        self.minutes.saturating_mul(60)
    }
}

/// Settings for the exact-then-fallback aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Fallback join direction.
    pub direction: JoinDirection,
    /// Maximum distance (inclusive, seconds) between paired buckets in the fallback join.
    pub tolerance_secs: i64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            direction: JoinDirection::Nearest,
            tolerance_secs: 120,
        }
    }
}

/// Settings for the resample/align/feature pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Resampler bucket granularity.
    pub bucketing: Bucketing,
    /// Aligner settings.
    pub align: AlignConfig,
    /// How many rows ahead the target is taken from (>= 1).
    pub target_horizon: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            bucketing: Bucketing::default(),
            align: AlignConfig::default(),
            target_horizon: 1,
        }
    }
}

impl PipelineConfig {
    /// Check the invariants the pipeline stages rely on.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the bucket width is outside one minute to one
    /// week, the offset is a day or more, the tolerance is negative, or the
    /// target horizon is zero.
    pub fn validate(&self) -> Result<(), SensorcastError> {
        if !(1..=Bucketing::MAX_MINUTES).contains(&self.bucketing.minutes) {
            return Err(SensorcastError::InvalidArg(format!(
                "bucket width must be between 1 and {} minutes, got {}",
                Bucketing::MAX_MINUTES,
                self.bucketing.minutes
            )));
        }
        if let Some(off) = self
            .bucketing
            .utc_offset_seconds
            .filter(|off| off.unsigned_abs() >= Bucketing::MAX_OFFSET_SECONDS.unsigned_abs())
        {
            return Err(SensorcastError::InvalidArg(format!(
                "utc offset must be less than a day, got {off}s"
            )));
        }
        if self.align.tolerance_secs < 0 {
            return Err(SensorcastError::InvalidArg(format!(
                "join tolerance must not be negative, got {}s",
                self.align.tolerance_secs
            )));
        }
        if self.target_horizon == 0 {
            return Err(SensorcastError::InvalidArg(
                "target horizon must be at least one row".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for the chronological train/test evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Fraction of rows (taken from the end) held out for scoring.
    pub holdout_fraction: f64,
    /// Below this many rows the model is fit and scored on the full frame.
    pub min_rows_for_holdout: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            holdout_fraction: 0.25,
            min_rows_for_holdout: 10,
        }
    }
}

/// Global configuration for the `Sensorcast` orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorcastConfig {
    /// Stream whose future value is predicted (temperature in the reference deployment).
    pub target: StreamSpec,
    /// Correlated auxiliary stream used as a second feature.
    pub auxiliary: StreamSpec,
    /// Pipeline stage settings.
    pub pipeline: PipelineConfig,
    /// Evaluation settings for the training driver.
    pub evaluation: EvaluationConfig,
    /// Timeout for each individual source fetch.
    pub source_timeout: Duration,
    /// Optional deadline covering both fetches of one operation.
    pub request_timeout: Option<Duration>,
    /// Metrics file written by the training driver, shown on the dashboard when set.
    pub metrics_path: Option<PathBuf>,
}

impl Default for SensorcastConfig {
    fn default() -> Self {
        Self {
            target: StreamSpec::new(1, "TEMP"),
            auxiliary: StreamSpec::new(2, "AUX"),
            pipeline: PipelineConfig::default(),
            evaluation: EvaluationConfig::default(),
            source_timeout: Duration::from_secs(5),
            request_timeout: None,
            metrics_path: None,
        }
    }
}
