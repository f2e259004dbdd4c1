//! Report envelopes handed to the dashboard and training collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SensorcastError;

/// Scalar metrics record written for downstream consumers.
///
/// Serialized as a flat JSON object, e.g.
/// `{"model": "LinearRegressor", "metric": "MAE", "value": 0.42, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Model name.
    pub model: String,
    /// Metric name (e.g. "MAE").
    pub metric: String,
    /// Metric value.
    pub value: f64,
    /// Sensor id of the auxiliary stream the model was trained with.
    pub aux_sensor_id: u32,
    /// Label of the auxiliary stream.
    pub aux_label: String,
}

/// Outcome of fitting and scoring one regressor on a training frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    /// Flat metrics record for the file hand-off.
    pub metrics: MetricsRecord,
    /// Rows used to fit the model.
    pub train_rows: usize,
    /// Rows the metric was computed on.
    pub test_rows: usize,
    /// True when the frame was too small to hold out a test set and the model
    /// was scored on the rows it was fit on.
    pub in_sample: bool,
    /// `(actual, predicted)` pairs for the scored rows, chronological.
    pub predictions: Vec<(f64, f64)>,
}

/// One bucket whose target value exceeded the dashboard threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Bucket start.
    pub bucket: DateTime<Utc>,
    /// Target value observed in that bucket.
    pub value: f64,
}

/// Presentation-ready summary of the recent window of both streams.
///
/// Statistics over a stream are `None` when that stream had no values in the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Label of the target stream.
    pub target_label: String,
    /// Label of the auxiliary stream.
    pub aux_label: String,
    /// Number of buckets in the outer-joined frame.
    pub rows: usize,
    /// Minimum target value.
    pub target_min: Option<f64>,
    /// Maximum target value.
    pub target_max: Option<f64>,
    /// Mean target value.
    pub target_mean: Option<f64>,
    /// Mean auxiliary value.
    pub aux_mean: Option<f64>,
    /// Threshold the alerts were computed against.
    pub threshold: f64,
    /// Buckets where the target exceeded the threshold, chronological.
    pub alerts: Vec<Alert>,
}

impl DashboardSnapshot {
    /// Number of alert buckets.
    #[must_use]
    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }
}

/// Dashboard snapshot plus non-fatal issues (e.g. one stream had no data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// Computed snapshot.
    pub snapshot: DashboardSnapshot,
    /// Latest model metrics, when a metrics file is configured and present.
    pub model: Option<MetricsRecord>,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<SensorcastError>,
}
