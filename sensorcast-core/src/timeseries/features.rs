use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timeseries::align::PairedFrame;
use crate::types::SensorcastError;

/// Features at one bucket plus the target taken `horizon` rows later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    /// Bucket of the feature values.
    pub bucket: DateTime<Utc>,
    /// Target stream value at `bucket`.
    pub value_a: f64,
    /// Auxiliary stream value at `bucket`.
    pub value_b: f64,
    /// Target stream value `horizon` rows later.
    pub target: f64,
}

/// Supervised frame in ascending bucket order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingFrame {
    /// Rows in bucket order.
    pub rows: Vec<TrainingRow>,
    /// Row offset the target was taken from.
    pub horizon: usize,
}

impl TrainingFrame {
    /// Feature matrix `[value_a, value_b]` per row.
    #[must_use]
    pub fn features(&self) -> Vec<[f64; 2]> {
        self.rows.iter().map(|r| [r.value_a, r.value_b]).collect()
    }

    /// Target vector.
    #[must_use]
    pub fn targets(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.target).collect()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pair each row with the target value `horizon` rows ahead.
///
/// The target is positional: it comes from the next row of the frame, not the
/// next wall-clock bucket, so gaps in the paired frame are not filled. The
/// trailing `horizon` rows have no target and are dropped.
#[must_use]
pub fn shift_target(paired: &PairedFrame, horizon: usize) -> TrainingFrame {
    let keep = paired.rows.len().saturating_sub(horizon);
    let rows = paired
        .rows
        .iter()
        .zip(paired.rows.iter().skip(horizon))
        .take(keep)
        .map(|(cur, ahead)| TrainingRow {
            bucket: cur.bucket,
            value_a: cur.value_a,
            value_b: cur.value_b,
            target: ahead.value_a,
        })
        .collect();
    TrainingFrame { rows, horizon }
}

/// Build the supervised frame.
///
/// # Errors
/// Returns `InvalidArg` when `horizon` is zero and `InsufficientRows` when the
/// paired frame has at most `horizon` rows.
pub fn build_training_frame(
    paired: &PairedFrame,
    horizon: usize,
) -> Result<TrainingFrame, SensorcastError> {
    if horizon == 0 {
        return Err(SensorcastError::InvalidArg(
            "target horizon must be at least one row".into(),
        ));
    }
    let frame = shift_target(paired, horizon);
    if frame.is_empty() {
        return Err(SensorcastError::InsufficientRows {
            rows: paired.rows.len(),
            required: horizon + 1,
        });
    }
    Ok(frame)
}
