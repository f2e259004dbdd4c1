use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sensorcast_core::{RawSample, RawValue};

/// First fixture minute: 2025-03-01 14:00 UTC.
pub fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn by_sensor(sensor_id: u32) -> Option<Vec<RawSample>> {
    match sensor_id {
        // temperature, twice a minute, comma decimals as a panel would log them
        1 => Some(build(
            TimeDelta::seconds(10),
            TimeDelta::seconds(30),
            &[
                "24,10", "24,30", "24,50", "24,70", "25,00", "25,20", "25,10", "25,40",
                "25,60", "25,80", "26,00", "26,20", "26,10", "26,30", "26,50", "26,70",
                "26,90", "27,10", "27,00", "27,20",
            ],
        )),
        // humidity, once a minute, shifted by 40s
        2 => Some(build(
            TimeDelta::seconds(40),
            TimeDelta::minutes(1),
            &[
                "61.0", "60.5", "60.2", "59.8", "59.1", "58.7", "58.9", "58.0", "57.6", "57.2",
            ],
        )),
        // pH reported only on odd minutes; never shares a bucket with sensor 4
        3 => Some(build(
            TimeDelta::minutes(1),
            TimeDelta::minutes(2),
            &["6.8", "6.9", "7.0", "7.1", "7.0"],
        )),
        4 => Some(build(
            TimeDelta::zero(),
            TimeDelta::minutes(2),
            &["30.5", "31.0", "31.4", "31.9", "32.3"],
        )),
        // a stream the panel never filled
        5 => Some(build(
            TimeDelta::zero(),
            TimeDelta::minutes(1),
            &["", "n/a", "--"],
        )),
        _ => None,
    }
}

fn build(lead: TimeDelta, step: TimeDelta, values: &[&str]) -> Vec<RawSample> {
    let start = origin() + lead;
    let mut ts = start;
    values
        .iter()
        .map(|v| {
            let sample = RawSample {
                ts,
                value: RawValue::Text((*v).to_string()),
            };
            ts += step;
            sample
        })
        .collect()
}
