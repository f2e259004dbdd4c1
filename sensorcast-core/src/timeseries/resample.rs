use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sample::Sample;
use crate::types::{Bucketing, SensorcastError};

/// Mean of the valid samples that fell into one bucket.
///
/// A bucket whose samples were all unusable has `mean: None` and `count: 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketMean {
    /// Inclusive bucket start.
    pub bucket: DateTime<Utc>,
    /// Arithmetic mean of the valid samples, `None` when the bucket holds none.
    pub mean: Option<f64>,
    /// Number of valid samples contributing to `mean`.
    pub count: usize,
}

/// A resampled stream: ascending, unique bucket keys with their means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledSeries {
    label: String,
    points: Vec<BucketMean>,
}

impl ResampledSeries {
    /// Build a series from arbitrary points.
    ///
    /// Points are sorted by bucket; on duplicate keys the first occurrence wins.
    pub fn from_points(label: impl Into<String>, mut points: Vec<BucketMean>) -> Self {
        points.sort_by_key(|p| p.bucket);
        points.dedup_by_key(|p| p.bucket);
        Self {
            label: label.into(),
            points,
        }
    }

    /// Stream label this series was produced for.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Points in ascending bucket order.
    #[must_use]
    pub fn points(&self) -> &[BucketMean] {
        &self.points
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series holds no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean stored for `bucket`, if the bucket is present and has a value.
    #[must_use]
    pub fn get(&self, bucket: DateTime<Utc>) -> Option<f64> {
        self.points
            .binary_search_by_key(&bucket, |p| p.bucket)
            .ok()
            .and_then(|i| self.points[i].mean)
    }

    /// Bucket start timestamps in ascending order.
    pub fn buckets(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.points.iter().map(|p| p.bucket)
    }
}

/// Truncate `ts` to the start of its bucket.
///
/// With an offset, truncation happens on the shifted (local) clock and the
/// result is shifted back to UTC, so buckets align to local wall-clock minutes.
/// An offset that would push the timestamp out of range leaves `ts` unchanged.
#[must_use]
pub fn bucket_of(ts: DateTime<Utc>, bucketing: &Bucketing) -> DateTime<Utc> {
    let step = bucketing.step_seconds().max(60);
    let off = bucketing.utc_offset_seconds.unwrap_or(0);
    ts.timestamp()
        .checked_add(off)
        .and_then(|shifted| shifted.checked_sub(shifted.rem_euclid(step)))
        .and_then(|bucket| bucket.checked_sub(off))
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(ts)
}

/// Resample coerced samples into per-bucket means.
///
/// Every bucket that received a sample is emitted, including buckets whose
/// samples all failed coercion; those carry `mean: None` and `count: 0`.
/// Such buckets still take part in key matching during alignment.
///
/// # Errors
/// Returns `EmptyStream` when no sample carries a valid value.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        target = "sensorcast::core::resample",
        skip(samples, bucketing),
        fields(samples = samples.len(), minutes = bucketing.minutes),
    )
)]
pub fn resample_mean(
    label: &str,
    samples: &[Sample],
    bucketing: &Bucketing,
) -> Result<ResampledSeries, SensorcastError> {
    if samples.iter().all(|s| s.value.is_none()) {
        return Err(SensorcastError::empty_stream(label));
    }
    let mut keyed: Vec<(DateTime<Utc>, Option<f64>)> = samples
        .iter()
        .map(|s| (bucket_of(s.ts, bucketing), s.value))
        .collect();
    keyed.sort_by_key(|(b, _)| *b);

    let out: Vec<BucketMean> = keyed
        .chunk_by(|x, y| x.0 == y.0)
        .map(finalize_bucket)
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target = "sensorcast::core::resample",
        stream = label,
        buckets = out.len(),
        missing = out.iter().filter(|p| p.mean.is_none()).count(),
        "resampled stream"
    );

    Ok(ResampledSeries {
        label: label.to_string(),
        points: out,
    })
}

#[allow(clippy::cast_precision_loss)]
fn finalize_bucket(group: &[(DateTime<Utc>, Option<f64>)]) -> BucketMean {
    let (sum, count) = group
        .iter()
        .filter_map(|(_, v)| *v)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    BucketMean {
        bucket: group[0].0,
        mean: (count > 0).then(|| sum / count as f64),
        count,
    }
}
