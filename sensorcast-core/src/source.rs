use async_trait::async_trait;

use crate::sample::RawSample;
use crate::types::{SensorcastError, StreamSpec, TimeWindow};

/// A backend able to return raw samples for a sensor stream.
///
/// Implementors return samples in any order; values may be numeric or
/// numeric-like text and are coerced downstream. An implementor with nothing
/// for a stream may return either an empty vector or `NotFound`.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Stable identifier used in error tagging and logs.
    fn name(&self) -> &'static str;

    /// Human-readable vendor or backend name.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Fetch raw samples of `stream` whose timestamps fall in `window`.
    ///
    /// # Errors
    /// Returns an error if the backend fails or holds nothing for the stream.
    async fn fetch(
        &self,
        stream: &StreamSpec,
        window: &TimeWindow,
    ) -> Result<Vec<RawSample>, SensorcastError>;
}
