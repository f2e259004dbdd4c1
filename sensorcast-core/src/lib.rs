//! sensorcast-core
//!
//! Core types, traits, and pure pipeline stages shared across the sensorcast
//! workspace.
//!
//! - `sample`: raw/coerced samples and decimal normalization.
//! - `source`: the `SampleSource` trait implemented by data backends.
//! - `timeseries`: resampling, alignment and feature building.
//! - `pipeline`: the resample → align → features chain over fetched samples.
//!
//! The stages are synchronous. Only `SampleSource::fetch` is async and assumes
//! a Tokio 1.x runtime in the callers that drive it.
#![warn(missing_docs)]

/// Preparation chain over fetched samples.
pub mod pipeline;
/// Raw and coerced sample types.
pub mod sample;
/// Sample source trait.
pub mod source;
/// Time-series stages.
pub mod timeseries;
pub mod types;

pub use pipeline::{PreparedData, coerce_all, prepare};
pub use sample::{RawSample, RawValue, Sample, normalize_decimal};
pub use source::SampleSource;
pub use timeseries::align::{
    AlignedRow, ExactJoin, JoinMethod, PairedFrame, PairedRow, align, exact_join, outer_join,
    tolerance_join,
};
pub use timeseries::features::{TrainingFrame, TrainingRow, build_training_frame, shift_target};
pub use timeseries::resample::{BucketMean, ResampledSeries, bucket_of, resample_mean};
pub use types::*;
