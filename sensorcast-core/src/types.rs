//! Re-export of foundational types from `sensorcast-types`.
// Consolidated so downstream crates can depend on `sensorcast-core` only

pub use sensorcast_types::{
    AlignConfig, Alert, Bucketing, DashboardReport, DashboardSnapshot, EvaluationConfig,
    JoinDirection, MetricsRecord, ModelReport, PipelineConfig, SensorcastConfig, SensorcastError,
    StreamSpec, TimeWindow,
};
