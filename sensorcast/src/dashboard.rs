use std::path::Path;

use sensorcast_core::{
    Alert, Bucketing, DashboardReport, DashboardSnapshot, MetricsRecord, RawSample,
    ResampledSeries, SensorcastError, StreamSpec, TimeWindow, coerce_all, outer_join,
    resample_mean,
};

use crate::core::Sensorcast;
use crate::train::read_metrics;

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Summarize two resampled streams for presentation.
///
/// Rows come from an exact outer join on bucket key; no tolerance join is
/// attempted. Buckets whose samples were all unusable still count as rows.
/// A bucket raises an alert when its target value is strictly above `threshold`.
#[must_use]
pub fn build_snapshot(
    target: &ResampledSeries,
    auxiliary: &ResampledSeries,
    threshold: f64,
) -> DashboardSnapshot {
    let rows = outer_join(target, auxiliary);
    let target_values: Vec<f64> = target.points().iter().filter_map(|p| p.mean).collect();
    let aux_values: Vec<f64> = auxiliary.points().iter().filter_map(|p| p.mean).collect();
    let alerts = rows
        .iter()
        .filter_map(|r| {
            r.value_a
                .filter(|v| *v > threshold)
                .map(|value| Alert {
                    bucket: r.bucket,
                    value,
                })
        })
        .collect();

    DashboardSnapshot {
        target_label: target.label().to_string(),
        aux_label: auxiliary.label().to_string(),
        rows: rows.len(),
        target_min: target_values.iter().copied().reduce(f64::min),
        target_max: target_values.iter().copied().reduce(f64::max),
        target_mean: mean(&target_values),
        aux_mean: mean(&aux_values),
        threshold,
        alerts,
    }
}

fn resample_or_warn(
    stream: &StreamSpec,
    fetched: Result<Vec<RawSample>, SensorcastError>,
    bucketing: &Bucketing,
    warnings: &mut Vec<SensorcastError>,
) -> Result<ResampledSeries, SensorcastError> {
    let resampled = fetched
        .and_then(|raw| resample_mean(&stream.label, &coerce_all(&raw), bucketing));
    match resampled {
        Ok(series) => Ok(series),
        Err(e @ SensorcastError::EmptyStream { .. }) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(stream = %stream, "no samples in dashboard window");
            warnings.push(e);
            Ok(ResampledSeries::from_points(stream.label.clone(), vec![]))
        }
        Err(e) => Err(e),
    }
}

fn load_model_metrics(
    path: Option<&Path>,
    warnings: &mut Vec<SensorcastError>,
) -> Option<MetricsRecord> {
    let path = path?;
    if !path.exists() {
        warnings.push(SensorcastError::not_found(format!(
            "model metrics at {}; train the model first",
            path.display()
        )));
        return None;
    }
    read_metrics(path)
        .inspect_err(|e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %e, "unreadable metrics file");
            warnings.push(e.clone());
        })
        .ok()
}

impl Sensorcast {
    /// Build a dashboard snapshot over `window`.
    ///
    /// A stream without samples is reported in `warnings` and contributes no
    /// values; `threshold` only drives the alert list. When a metrics path is
    /// configured, the record found there is attached as `model`; a missing or
    /// unreadable file is a warning.
    ///
    /// # Errors
    /// - `EmptyStream` if neither stream has samples in the window.
    /// - `RequestTimeout` or a fetch error other than an empty stream.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "sensorcast::core::dashboard",
            skip(self),
            fields(target = %self.cfg.target, auxiliary = %self.cfg.auxiliary),
        )
    )]
    pub async fn dashboard(
        &self,
        window: &TimeWindow,
        threshold: f64,
    ) -> Result<DashboardReport, SensorcastError> {
        let (target, aux) = self.fetch_pair(window, "dashboard").await?;
        let bucketing = &self.cfg.pipeline.bucketing;
        let mut warnings = Vec::new();
        let target = resample_or_warn(&self.cfg.target, target, bucketing, &mut warnings)?;
        let aux = resample_or_warn(&self.cfg.auxiliary, aux, bucketing, &mut warnings)?;

        if target.is_empty() && aux.is_empty() {
            return Err(SensorcastError::empty_stream(format!(
                "{} and {}",
                self.cfg.target.label, self.cfg.auxiliary.label
            )));
        }

        let model = load_model_metrics(self.cfg.metrics_path.as_deref(), &mut warnings);
        Ok(DashboardReport {
            snapshot: build_snapshot(&target, &aux, threshold),
            model,
            warnings,
        })
    }
}
