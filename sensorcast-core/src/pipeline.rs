//! Resample → align → feature chain over already-fetched samples.

use serde::{Deserialize, Serialize};

use crate::sample::{RawSample, Sample};
use crate::timeseries::align::{PairedFrame, align};
use crate::timeseries::features::{TrainingFrame, build_training_frame};
use crate::timeseries::resample::{ResampledSeries, resample_mean};
use crate::types::{PipelineConfig, SensorcastError};

/// Everything the preparation chain produced for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedData {
    /// Resampled target stream.
    pub target: ResampledSeries,
    /// Resampled auxiliary stream.
    pub auxiliary: ResampledSeries,
    /// Complete rows after alignment.
    pub paired: PairedFrame,
    /// Supervised frame for model training.
    pub training: TrainingFrame,
}

/// Coerce raw samples, keeping un-coercible ones as missing values.
#[must_use]
pub fn coerce_all(raw: &[RawSample]) -> Vec<Sample> {
    raw.iter().map(RawSample::coerce).collect()
}

/// Run the full chain on two raw streams.
///
/// # Errors
/// Propagates the first failure: `InvalidArg` for a bad config, then
/// `EmptyStream`, `AlignmentFailure`, or `InsufficientRows` from the stages.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "sensorcast::core::prepare",
        skip(target, auxiliary, cfg),
        fields(target_samples = target.len(), aux_samples = auxiliary.len()),
    )
)]
pub fn prepare(
    target_label: &str,
    target: &[RawSample],
    aux_label: &str,
    auxiliary: &[RawSample],
    cfg: &PipelineConfig,
) -> Result<PreparedData, SensorcastError> {
    cfg.validate()?;
    let target = resample_mean(target_label, &coerce_all(target), &cfg.bucketing)?;
    let auxiliary = resample_mean(aux_label, &coerce_all(auxiliary), &cfg.bucketing)?;
    let paired = align(&target, &auxiliary, &cfg.align)?;
    let training = build_training_frame(&paired, cfg.target_horizon)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        method = ?paired.method,
        paired = paired.len(),
        training = training.len(),
        dropped = paired.len() - training.len(),
        "prepared training frame"
    );

    Ok(PreparedData {
        target,
        auxiliary,
        paired,
        training,
    })
}
