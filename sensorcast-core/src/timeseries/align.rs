use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::timeseries::resample::{BucketMean, ResampledSeries};
use crate::types::{AlignConfig, JoinDirection, SensorcastError};

/// One bucket of a two-stream join; either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    /// Bucket key (taken from stream A for tolerance joins).
    pub bucket: DateTime<Utc>,
    /// Value of the target stream.
    pub value_a: Option<f64>,
    /// Value of the auxiliary stream.
    pub value_b: Option<f64>,
}

impl AlignedRow {
    /// Both values, when the row is complete.
    #[must_use]
    pub fn complete(&self) -> Option<(f64, f64)> {
        Some((self.value_a?, self.value_b?))
    }
}

/// Outer join on bucket key: every key present in either series, ascending.
#[must_use]
pub fn outer_join(a: &ResampledSeries, b: &ResampledSeries) -> Vec<AlignedRow> {
    let mut rows: BTreeMap<DateTime<Utc>, AlignedRow> = BTreeMap::new();
    for p in a.points() {
        rows.insert(
            p.bucket,
            AlignedRow {
                bucket: p.bucket,
                value_a: p.mean,
                value_b: None,
            },
        );
    }
    for p in b.points() {
        rows.entry(p.bucket)
            .or_insert(AlignedRow {
                bucket: p.bucket,
                value_a: None,
                value_b: None,
            })
            .value_b = p.mean;
    }
    rows.into_values().collect()
}

/// Outcome of the exact-key join.
#[derive(Debug, Clone, PartialEq)]
pub enum ExactJoin {
    /// Outer-joined rows; at least one of them is complete.
    Joined(Vec<AlignedRow>),
    /// No bucket carries a value on both sides.
    Unjoinable,
}

/// Outer join that reports whether any row ended up complete.
#[must_use]
pub fn exact_join(a: &ResampledSeries, b: &ResampledSeries) -> ExactJoin {
    let rows = outer_join(a, b);
    if rows.iter().any(|r| r.complete().is_some()) {
        ExactJoin::Joined(rows)
    } else {
        ExactJoin::Unjoinable
    }
}

/// For every bucket of `a`, attach the `b` bucket selected by `cfg.direction`
/// if it lies within `cfg.tolerance_secs` (inclusive).
///
/// On an equidistant tie in `Nearest` mode the earlier `b` bucket wins.
/// Matching is on key alone; a matched `b` bucket without a mean still leaves
/// `value_b` empty.
#[must_use]
pub fn tolerance_join(a: &ResampledSeries, b: &ResampledSeries, cfg: &AlignConfig) -> Vec<AlignedRow> {
    let tolerance = TimeDelta::seconds(cfg.tolerance_secs.max(0));
    let right = b.points();
    a.points()
        .iter()
        .map(|p| {
            let hit = pick(right, p.bucket, cfg.direction)
                .filter(|m| (m.bucket - p.bucket).abs() <= tolerance);
            AlignedRow {
                bucket: p.bucket,
                value_a: p.mean,
                value_b: hit.and_then(|m| m.mean),
            }
        })
        .collect()
}

fn pick(right: &[BucketMean], key: DateTime<Utc>, direction: JoinDirection) -> Option<&BucketMean> {
    // first index with bucket >= key
    let idx = right.partition_point(|m| m.bucket < key);
    let at_or_after = right.get(idx);
    let backward = match at_or_after {
        Some(m) if m.bucket == key => Some(m),
        _ => idx.checked_sub(1).map(|i| &right[i]),
    };
    match direction {
        JoinDirection::Backward => backward,
        JoinDirection::Forward => at_or_after,
        JoinDirection::Nearest => match (backward, at_or_after) {
            (Some(lo), Some(hi)) => {
                if hi.bucket - key < key - lo.bucket {
                    Some(hi)
                } else {
                    Some(lo)
                }
            }
            (lo, hi) => lo.or(hi),
        },
    }
}

/// Which join produced a [`PairedFrame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinMethod {
    /// Buckets matched on identical keys.
    Exact,
    /// Fallback tolerance-bounded join.
    Nearest,
}

/// A row where both streams have a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairedRow {
    /// Bucket key.
    pub bucket: DateTime<Utc>,
    /// Target stream value.
    pub value_a: f64,
    /// Auxiliary stream value.
    pub value_b: f64,
}

/// Complete rows in ascending bucket order, tagged with the join that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedFrame {
    /// Complete rows.
    pub rows: Vec<PairedRow>,
    /// Join that produced the rows.
    pub method: JoinMethod,
}

impl PairedFrame {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn complete_rows(rows: &[AlignedRow]) -> Vec<PairedRow> {
    rows.iter()
        .filter_map(|r| {
            r.complete().map(|(value_a, value_b)| PairedRow {
                bucket: r.bucket,
                value_a,
                value_b,
            })
        })
        .collect()
}

/// Pair two resampled streams.
///
/// The exact join is tried first and used whenever it yields a complete row.
/// Only if it yields none does the tolerance join run.
///
/// # Errors
/// Returns `AlignmentFailure` when neither join yields a complete row.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "sensorcast::core::align",
        skip(a, b, cfg),
        fields(a = a.label(), b = b.label(), tolerance_secs = cfg.tolerance_secs),
    )
)]
pub fn align(
    a: &ResampledSeries,
    b: &ResampledSeries,
    cfg: &AlignConfig,
) -> Result<PairedFrame, SensorcastError> {
    if let ExactJoin::Joined(rows) = exact_join(a, b) {
        return Ok(PairedFrame {
            rows: complete_rows(&rows),
            method: JoinMethod::Exact,
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        direction = ?cfg.direction,
        "exact join produced no complete rows; falling back to tolerance join"
    );

    let rows = complete_rows(&tolerance_join(a, b, cfg));
    if rows.is_empty() {
        return Err(SensorcastError::AlignmentFailure {
            tolerance_secs: cfg.tolerance_secs,
        });
    }
    Ok(PairedFrame {
        rows,
        method: JoinMethod::Nearest,
    })
}
