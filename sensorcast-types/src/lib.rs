//! Sensorcast-specific error taxonomy, configuration primitives, and report records.
#![warn(missing_docs)]

mod config;
mod error;
mod reports;
mod stream;

pub use config::{
    AlignConfig, Bucketing, EvaluationConfig, JoinDirection, PipelineConfig, SensorcastConfig,
};
pub use error::SensorcastError;
pub use reports::{Alert, DashboardReport, DashboardSnapshot, MetricsRecord, ModelReport};
pub use stream::{StreamSpec, TimeWindow};
