//! Stream identifiers and fetch windows usable across crates.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one sensor stream in a source, plus the label used in frames and messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamSpec {
    /// Numeric sensor id as stored upstream.
    pub sensor_id: u32,
    /// Display label (e.g. "TEMP", "HUMIDITY").
    pub label: String,
}

impl StreamSpec {
    /// Construct a stream spec from a sensor id and a label.
    pub fn new(sensor_id: u32, label: impl Into<String>) -> Self {
        Self {
            sensor_id,
            label: label.into(),
        }
    }
}

impl std::fmt::Display for StreamSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (sensor {})", self.label, self.sensor_id)
    }
}

/// Half-open time window `[start, end)` for a fetch. `None` bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound.
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// The unbounded window (full history).
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Window covering the last `minutes` minutes before `now`, open-ended at the top.
    ///
    /// A span reaching past the representable range leaves the start unbounded.
    #[must_use]
    pub fn trailing(now: DateTime<Utc>, minutes: i64) -> Self {
        Self {
            start: TimeDelta::try_minutes(minutes).and_then(|d| now.checked_sub_signed(d)),
            end: None,
        }
    }

    /// Explicit `[start, end)` window.
    #[must_use]
    pub const fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Whether `ts` falls inside the window.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts < e)
    }
}
