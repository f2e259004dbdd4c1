use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the sensorcast workspace.
///
/// The three data conditions (`EmptyStream`, `AlignmentFailure`,
/// `InsufficientRows`) abort a pipeline run and are meant to be shown to users
/// as "insufficient data" rather than as crashes. The remaining variants cover
/// argument validation, source-tagged failures, and timeouts at the fetch seam.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SensorcastError {
    /// A requested stream yielded zero valid samples after coercion.
    #[error("no valid samples for stream {stream}")]
    EmptyStream {
        /// Label of the stream that came back empty (e.g. "TEMP" or "sensor 2").
        stream: String,
    },

    /// Neither the exact join nor the tolerance-bounded join produced a complete row.
    #[error("could not pair streams even with a {tolerance_secs}s tolerance")]
    AlignmentFailure {
        /// Tolerance used by the fallback join, in seconds.
        tolerance_secs: i64,
    },

    /// The paired frame is too short to derive a future target.
    #[error("insufficient rows: have {rows}, need at least {required}")]
    InsufficientRows {
        /// Number of complete rows available.
        rows: usize,
        /// Minimum number of rows required.
        required: usize,
    },

    /// Issues with the returned or expected data (malformed files, missing columns, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// A source reported that it holds nothing for the request.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "samples for sensor 1".
        what: String,
    },

    /// An individual sample source returned an error.
    #[error("{source_name} failed: {msg}")]
    Source {
        /// Source name that failed.
        source_name: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual source call exceeded the configured timeout.
    #[error("source timed out: {stream} via {source_name}")]
    SourceTimeout {
        /// Source name that timed out.
        source_name: String,
        /// Stream label being fetched.
        stream: String,
    },

    /// The overall operation exceeded the configured deadline.
    #[error("request timed out: {operation}")]
    RequestTimeout {
        /// Operation label (e.g. "prepare_training", "dashboard").
        operation: String,
    },

    /// Filesystem or stream I/O failure, carried as text so the error stays `Clone`.
    #[error("io error: {0}")]
    Io(String),

    /// Every requested stream failed; contains the individual failures.
    #[error("all streams failed: {0:?}")]
    AllStreamsFailed(Vec<SensorcastError>),
}

impl SensorcastError {
    /// Helper: build an `EmptyStream` error for a stream label.
    pub fn empty_stream(stream: impl Into<String>) -> Self {
        Self::EmptyStream {
            stream: stream.into(),
        }
    }

    /// Helper: build a `Source` error with the source name and message.
    pub fn source(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Source {
            source_name: source_name.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `SourceTimeout` error.
    pub fn source_timeout(source_name: impl Into<String>, stream: impl Into<String>) -> Self {
        Self::SourceTimeout {
            source_name: source_name.into(),
            stream: stream.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(operation: impl Into<String>) -> Self {
        Self::RequestTimeout {
            operation: operation.into(),
        }
    }

    /// Returns true for the data conditions that should be presented as
    /// "insufficient data" instead of a failure.
    ///
    /// Aggregates are classified as insufficient only if every inner error is.
    #[must_use]
    pub fn is_insufficient_data(&self) -> bool {
        match self {
            Self::EmptyStream { .. }
            | Self::AlignmentFailure { .. }
            | Self::InsufficientRows { .. } => true,
            Self::AllStreamsFailed(inner) => {
                !inner.is_empty() && inner.iter().all(Self::is_insufficient_data)
            }
            _ => false,
        }
    }

    /// Flatten nested `AllStreamsFailed` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllStreamsFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

impl From<std::io::Error> for SensorcastError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
