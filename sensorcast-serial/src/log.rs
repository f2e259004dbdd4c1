use std::io::BufRead;
use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use sensorcast_core::SensorcastError;

/// Column names printed by the firmware, in order.
pub const HEADER_NAMES: [&str; 6] = ["contador", "fosforo", "potassio", "ph", "umidade", "bomba"];

const ROW_PATTERN: &str = r"^\s*(\d+)\s*,\s*([01])\s*,\s*([01])\s*,\s*([0-9]+(?:\.[0-9]+)?)\s*,\s*([0-9]+(?:\.[0-9]+)?)\s*,\s*([01])\s*$";

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ROW_PATTERN).expect("valid regex"));

/// One reading line from the ESP32 serial monitor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerialRow {
    /// Firmware sample counter.
    pub counter: u64,
    /// Phosphorus sensor flag.
    pub phosphorus: bool,
    /// Potassium sensor flag.
    pub potassium: bool,
    /// Soil pH.
    pub ph: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Whether the irrigation pump was on.
    pub pump: bool,
}

fn is_header(line: &str) -> bool {
    let bare = line.trim_start_matches('#').trim().to_ascii_lowercase();
    bare == HEADER_NAMES.join(",")
}

fn parse_row(line: &str) -> Option<SerialRow> {
    let caps = ROW_RE.captures(line)?;
    let flag = |i: usize| caps.get(i).is_some_and(|m| m.as_str() == "1");
    Some(SerialRow {
        counter: caps.get(1)?.as_str().parse().ok()?,
        phosphorus: flag(2),
        potassium: flag(3),
        ph: caps.get(4)?.as_str().parse().ok()?,
        humidity: caps.get(5)?.as_str().parse().ok()?,
        pump: flag(6),
    })
}

/// Parse a serial-monitor capture into reading rows.
///
/// Blank lines, `Terminal on ...` banners, the header line (with or without a
/// leading `#`) and any line not shaped exactly like a reading are skipped.
/// Non-UTF-8 bytes are replaced rather than rejected.
///
/// # Errors
/// Returns `Io` if reading fails, and `Data` if no reading line was found.
pub fn parse_serial_log<R: BufRead>(mut reader: R) -> Result<Vec<SerialRow>, SensorcastError> {
    let mut rows = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let text = String::from_utf8_lossy(&buf);
        let line = text.trim();
        if line.is_empty() || line.starts_with("Terminal on ") || is_header(line) {
            continue;
        }
        match parse_row(line) {
            Some(row) => rows.push(row),
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(line, "skipping malformed serial line");
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(rows = rows.len(), "parsed serial log");

    if rows.is_empty() {
        return Err(SensorcastError::Data(format!(
            "no reading lines found; expected rows after the header #{}",
            HEADER_NAMES.join(",")
        )));
    }
    Ok(rows)
}

/// Synthetic temperature consistent with pH and humidity.
///
/// `25 + (h - 50) / 2 + (ph - 7) * 4 + noise`, clamped to `[18, 90]` and
/// rounded to two decimals.
#[must_use]
pub fn derive_temperature(ph: f64, humidity: f64, noise: f64) -> f64 {
    let base = 25.0 + (humidity - 50.0) / 2.0 + (ph - 7.0) * 4.0;
    let v = (base + noise).clamp(18.0, 90.0);
    (v * 100.0).round() / 100.0
}

/// Draw temperature noise uniformly from `[-1.0, 1.5)`.
pub fn draw_noise<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random_range(-1.0..1.5)
}
