//! Sensorcast turns two raw sensor streams into a supervised training frame.
//!
//! Overview
//! - Fetches a target stream and an auxiliary stream from registered
//!   `SampleSource`s, concurrently and under per-source and per-request timeouts.
//! - Resamples each stream to per-bucket means, pairs them with an exact join
//!   (falling back to a tolerance-bounded nearest join only when the exact join
//!   yields nothing), and shifts the target forward to build features/labels.
//! - Provides a dashboard snapshot over a recent window and a small
//!   training/evaluation driver with a JSON metrics hand-off.
//!
//! Insufficient data (`EmptyStream`, `AlignmentFailure`, `InsufficientRows`) is
//! an expected outcome on sparse deployments; check
//! [`SensorcastError::is_insufficient_data`] before treating an error as a fault.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use sensorcast::{LinearRegressor, Sensorcast, StreamSpec, TimeWindow};
//! use sensorcast_serial::CsvSource;
//!
//! let sc = Sensorcast::builder()
//!     .with_source(Arc::new(CsvSource::readings("data/readings.csv", 1, 2)))
//!     .target(StreamSpec::new(1, "TEMP"))
//!     .auxiliary(StreamSpec::new(2, "HUMIDITY"))
//!     .build()?;
//!
//! let mut model = LinearRegressor::new();
//! let report = sc.train(&TimeWindow::all(), &mut model).await?;
//! sensorcast::write_metrics("metrics.json", &report.metrics)?;
//! ```
//!
//! See `sensorcast/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod dashboard;
/// Regressors, evaluation and metrics hand-off.
pub mod train;

pub use crate::core::{Sensorcast, SensorcastBuilder, tag_err};
pub use dashboard::build_snapshot;
pub use train::{
    LinearRegressor, PersistenceRegressor, Regressor, evaluate, holdout_size, mean_absolute_error,
    read_metrics, write_metrics,
};

// Re-export core types for convenience
pub use sensorcast_core::{
    AlignConfig, Alert, BucketMean, Bucketing, DashboardReport, DashboardSnapshot,
    EvaluationConfig, JoinDirection, JoinMethod, MetricsRecord, ModelReport, PairedFrame,
    PairedRow, PipelineConfig, PreparedData, RawSample, RawValue, ResampledSeries, Sample,
    SampleSource, SensorcastConfig, SensorcastError, StreamSpec, TimeWindow, TrainingFrame,
    TrainingRow,
};
