//! Raw and coerced sample types, plus decimal normalization at the ingestion boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Value as delivered by a source: already numeric, or numeric-like text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawValue {
    /// A value the source already decoded as a number.
    Number(f64),
    /// Text that may use either `.` or `,` as decimal separator.
    Text(String),
    /// The source reported no value (e.g. SQL `NULL`).
    Missing,
}

impl RawValue {
    /// Coerce to a finite `f64`, or `None` when the value is missing or malformed.
    #[must_use]
    pub fn coerce(&self) -> Option<f64> {
        match self {
            Self::Number(v) => v.is_finite().then_some(*v),
            Self::Text(s) => normalize_decimal(s),
            Self::Missing => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Option<f64>> for RawValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Self::Missing, Self::Number)
    }
}

/// A single reading as fetched from a source, before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Observation instant.
    pub ts: DateTime<Utc>,
    /// Uncoerced value.
    pub value: RawValue,
}

impl RawSample {
    /// Construct a raw sample.
    pub fn new(ts: DateTime<Utc>, value: impl Into<RawValue>) -> Self {
        Self {
            ts,
            value: value.into(),
        }
    }

    /// Coerce the value, keeping the timestamp.
    #[must_use]
    pub fn coerce(&self) -> Sample {
        Sample {
            ts: self.ts,
            value: self.value.coerce(),
        }
    }
}

/// A reading after coercion; `value` is `None` when the raw value was unusable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation instant.
    pub ts: DateTime<Utc>,
    /// Coerced value.
    pub value: Option<f64>,
}

/// Parse numeric text that may use `,` as the decimal separator.
///
/// Surrounding whitespace is ignored and every `,` is read as `.`. Text that
/// still fails to parse (including thousands-grouped input such as `1.234,5`)
/// or that denotes a non-finite number yields `None`.
///
/// ```
/// use sensorcast_core::normalize_decimal;
/// assert_eq!(normalize_decimal("7,00"), Some(7.0));
/// assert_eq!(normalize_decimal(" 7.00 "), Some(7.0));
/// assert_eq!(normalize_decimal("1.234,5"), None);
/// assert_eq!(normalize_decimal("n/a"), None);
/// ```
#[must_use]
pub fn normalize_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let v: f64 = if trimmed.contains(',') {
        trimmed.replace(',', ".").parse().ok()?
    } else {
        trimmed.parse().ok()?
    };
    v.is_finite().then_some(v)
}
