//! Time-series stages of the preparation pipeline.
//!
//! - `resample`: bucket samples and average valid values
//! - `align`: exact-then-tolerance join of two resampled streams
//! - `features`: shift the target forward to form a supervised frame
/// Exact and tolerance-bounded joins.
pub mod align;
/// Supervised frame construction.
pub mod features;
/// Bucket-mean resampling.
pub mod resample;
