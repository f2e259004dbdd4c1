use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sensorcast_core::{
    PipelineConfig, PreparedData, RawSample, SampleSource, SensorcastConfig, SensorcastError,
    StreamSpec, TimeWindow,
};
use sensorcast_types::EvaluationConfig;

/// Orchestrator that fetches the target and auxiliary streams and runs the
/// preparation pipeline on them.
pub struct Sensorcast {
    pub(crate) sources: Vec<Arc<dyn SampleSource>>,
    pub(crate) cfg: SensorcastConfig,
}

/// Builder for constructing a `Sensorcast` orchestrator with custom configuration.
pub struct SensorcastBuilder {
    sources: Vec<Arc<dyn SampleSource>>,
    cfg: SensorcastConfig,
}

impl Default for SensorcastBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorcastBuilder {
    /// Create a new builder with the default configuration.
    ///
    /// Starts with no sources; register at least one via [`Self::with_source`].
    /// Defaults: target sensor 1, auxiliary sensor 2, one-minute buckets,
    /// nearest fallback within two minutes, horizon 1, 5s source timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: vec![],
            cfg: SensorcastConfig::default(),
        }
    }

    /// Register a sample source.
    ///
    /// Sources are tried in registration order for every stream; a source
    /// that has nothing for a stream (empty or `NotFound`) hands over to the next.
    #[must_use]
    pub fn with_source(mut self, s: Arc<dyn SampleSource>) -> Self {
        self.sources.push(s);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: SensorcastConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Stream whose future value is predicted.
    #[must_use]
    pub fn target(mut self, stream: StreamSpec) -> Self {
        self.cfg.target = stream;
        self
    }

    /// Auxiliary stream used as the second feature.
    #[must_use]
    pub fn auxiliary(mut self, stream: StreamSpec) -> Self {
        self.cfg.auxiliary = stream;
        self
    }

    /// Pipeline stage settings.
    #[must_use]
    pub const fn pipeline(mut self, cfg: PipelineConfig) -> Self {
        self.cfg.pipeline = cfg;
        self
    }

    /// Train/test split settings for [`Sensorcast::train`].
    #[must_use]
    pub const fn evaluation(mut self, cfg: EvaluationConfig) -> Self {
        self.cfg.evaluation = cfg;
        self
    }

    /// Set the per-source fetch timeout.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Metrics file the dashboard reads the latest model record from.
    #[must_use]
    pub fn metrics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cfg.metrics_path = Some(path.into());
        self
    }

    /// Set an overall deadline covering both fetches of one operation.
    ///
    /// When exceeded, returns a `RequestTimeout` error naming the operation.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Build the `Sensorcast` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no source is registered, if target and
    /// auxiliary name the same sensor, or if the pipeline or evaluation
    /// settings are out of range.
    pub fn build(self) -> Result<Sensorcast, SensorcastError> {
        if self.sources.is_empty() {
            return Err(SensorcastError::InvalidArg(
                "no sources registered; add at least one via with_source(...)".to_string(),
            ));
        }
        if self.cfg.target.sensor_id == self.cfg.auxiliary.sensor_id {
            return Err(SensorcastError::InvalidArg(format!(
                "target and auxiliary must be different sensors, both are {}",
                self.cfg.target.sensor_id
            )));
        }
        self.cfg.pipeline.validate()?;
        let frac = self.cfg.evaluation.holdout_fraction;
        if !(frac > 0.0 && frac < 1.0) {
            return Err(SensorcastError::InvalidArg(format!(
                "holdout fraction must lie in (0, 1), got {frac}"
            )));
        }

        Ok(Sensorcast {
            sources: self.sources,
            cfg: self.cfg,
        })
    }
}

/// Attribute a source failure to the source that produced it.
///
/// Errors that already carry attribution or describe a data condition pass through.
#[must_use]
pub fn tag_err(source_name: &str, e: SensorcastError) -> SensorcastError {
    match e {
        e @ (SensorcastError::NotFound { .. }
        | SensorcastError::EmptyStream { .. }
        | SensorcastError::Source { .. }
        | SensorcastError::SourceTimeout { .. }
        | SensorcastError::RequestTimeout { .. }
        | SensorcastError::AllStreamsFailed(_)) => e,
        other => SensorcastError::Source {
            source_name: source_name.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Apply an optional deadline to a future, mapping expiry to `RequestTimeout`.
pub(crate) async fn with_request_deadline<F, T>(
    deadline: Option<Duration>,
    operation: &'static str,
    fut: F,
) -> Result<T, SensorcastError>
where
    F: std::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| SensorcastError::request_timeout(operation)),
        None => Ok(fut.await),
    }
}

impl Sensorcast {
    /// Start building a new `Sensorcast` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use sensorcast::{Sensorcast, StreamSpec};
    /// use sensorcast_serial::CsvSource;
    ///
    /// let csv = Arc::new(CsvSource::readings("data/readings.csv", 1, 2));
    /// let sc = Sensorcast::builder()
    ///     .with_source(csv)
    ///     .target(StreamSpec::new(1, "TEMP"))
    ///     .auxiliary(StreamSpec::new(2, "HUMIDITY"))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> SensorcastBuilder {
        SensorcastBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SensorcastConfig {
        &self.cfg
    }

    /// Wrap a source future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "sensorcast::core::source_call_with_timeout",
            skip(fut),
            fields(
                source = source_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn source_call_with_timeout<T, Fut>(
        source_name: &'static str,
        stream: &str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, SensorcastError>
    where
        Fut: std::future::Future<Output = Result<T, SensorcastError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(SensorcastError::source_timeout(source_name, stream)))
    }

    /// Fetch one stream, trying sources in registration order.
    ///
    /// - The first source returning a non-empty vector wins.
    /// - If every source is empty or `NotFound`, the stream is `EmptyStream`.
    /// - A single remaining failure is returned as-is; several are aggregated.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "sensorcast::core::fetch_stream",
            skip(self, stream, window),
            fields(stream = %stream),
        )
    )]
    pub(crate) async fn fetch_stream(
        &self,
        stream: &StreamSpec,
        window: &TimeWindow,
    ) -> Result<Vec<RawSample>, SensorcastError> {
        let mut errors: Vec<SensorcastError> = Vec::new();
        for s in &self.sources {
            let res = Self::source_call_with_timeout(
                s.name(),
                &stream.label,
                self.cfg.source_timeout,
                s.fetch(stream, window),
            )
            .await;
            match res {
                Ok(samples) if !samples.is_empty() => return Ok(samples),
                Ok(_) | Err(SensorcastError::NotFound { .. }) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(source = s.name(), "source has no samples for stream");
                }
                Err(e) => errors.push(tag_err(s.name(), e)),
            }
        }

        match errors.len() {
            0 => Err(SensorcastError::empty_stream(stream.label.clone())),
            1 => Err(errors.remove(0)),
            _ => Err(SensorcastError::AllStreamsFailed(errors)),
        }
    }

    /// Fetch target and auxiliary concurrently under the request deadline.
    pub(crate) async fn fetch_pair(
        &self,
        window: &TimeWindow,
        operation: &'static str,
    ) -> Result<
        (
            Result<Vec<RawSample>, SensorcastError>,
            Result<Vec<RawSample>, SensorcastError>,
        ),
        SensorcastError,
    > {
        let target = self.fetch_stream(&self.cfg.target, window);
        let aux = self.fetch_stream(&self.cfg.auxiliary, window);
        with_request_deadline(
            self.cfg.request_timeout,
            operation,
            futures::future::join(target, aux),
        )
        .await
    }

    /// Fetch both streams and run resample → align → features.
    ///
    /// # Errors
    /// - `RequestTimeout` if the overall deadline expires.
    /// - The fetch error of a failing stream, or `AllStreamsFailed` with both
    ///   when both fetches fail.
    /// - `EmptyStream`, `AlignmentFailure` or `InsufficientRows` from the
    ///   pipeline stages; these satisfy [`SensorcastError::is_insufficient_data`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "sensorcast::core::prepare_training",
            skip(self),
            fields(target = %self.cfg.target, auxiliary = %self.cfg.auxiliary),
        )
    )]
    pub async fn prepare_training(
        &self,
        window: &TimeWindow,
    ) -> Result<PreparedData, SensorcastError> {
        let (target, aux) = self.fetch_pair(window, "prepare_training").await?;
        let (target, aux) = match (target, aux) {
            (Ok(t), Ok(a)) => (t, a),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
            (Err(e1), Err(e2)) => return Err(SensorcastError::AllStreamsFailed(vec![e1, e2])),
        };
        sensorcast_core::prepare(
            &self.cfg.target.label,
            &target,
            &self.cfg.auxiliary.label,
            &aux,
            &self.cfg.pipeline,
        )
    }
}
