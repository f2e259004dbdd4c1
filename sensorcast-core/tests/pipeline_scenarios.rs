use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sensorcast_core::{
    Bucketing, JoinMethod, PipelineConfig, RawSample, SensorcastError, prepare,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap()
}

fn stream(start: DateTime<Utc>, step: TimeDelta, values: &[f64]) -> Vec<RawSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| RawSample::new(start + step * i32::try_from(i).unwrap(), v))
        .collect()
}

#[test]
fn half_minute_offset_pairs_overlapping_minutes() {
    // A at :40 of minutes 0..4; B thirty seconds later, i.e. :10 of minutes 1..5.
    let a = stream(base() + TimeDelta::seconds(40), TimeDelta::minutes(1), &[20.0, 21.0, 22.0, 23.0, 24.0]);
    let b = stream(base() + TimeDelta::seconds(70), TimeDelta::minutes(1), &[5.0, 6.0, 7.0, 8.0, 9.0]);

    let out = prepare("A", &a, "B", &b, &PipelineConfig::default()).unwrap();
    assert_eq!(out.target.len(), 5);
    assert_eq!(out.auxiliary.len(), 5);
    // Minutes 1..4 overlap exactly; minute 0 of A and minute 5 of B dangle.
    assert_eq!(out.paired.method, JoinMethod::Exact);
    assert_eq!(out.paired.len(), 4);
    assert_eq!(out.training.len(), 3);
    assert_eq!(out.training.features(), vec![[21.0, 5.0], [22.0, 6.0], [23.0, 7.0]]);
    assert_eq!(out.training.targets(), vec![22.0, 23.0, 24.0]);
}

#[test]
fn disjoint_minutes_fall_back_to_nearest() {
    // A on even minutes, B on odd minutes: no shared bucket, every gap is 60s.
    let step = TimeDelta::minutes(2);
    let a = stream(base(), step, &[20.0, 21.0, 22.0, 23.0, 24.0]);
    let b = stream(base() + TimeDelta::minutes(1), step, &[5.0, 6.0, 7.0, 8.0, 9.0]);

    let out = prepare("A", &a, "B", &b, &PipelineConfig::default()).unwrap();
    assert_eq!(out.paired.method, JoinMethod::Nearest);
    assert_eq!(out.paired.len(), 5);
    // Ties resolve to the earlier B bucket.
    let bs: Vec<f64> = out.paired.rows.iter().map(|r| r.value_b).collect();
    assert_eq!(bs, vec![5.0, 5.0, 6.0, 7.0, 8.0]);
    assert_eq!(out.training.len(), 4);
    assert_eq!(out.training.targets(), vec![21.0, 22.0, 23.0, 24.0]);
}

#[test]
fn coarser_buckets_merge_offset_streams() {
    let a = stream(base() + TimeDelta::seconds(40), TimeDelta::minutes(1), &[20.0, 21.0, 22.0, 23.0, 24.0]);
    let b = stream(base() + TimeDelta::seconds(70), TimeDelta::minutes(1), &[5.0, 6.0, 7.0, 8.0, 9.0]);
    let cfg = PipelineConfig {
        bucketing: Bucketing::minutes(5),
        ..PipelineConfig::default()
    };
    // A collapses to one bucket; B spills into the next one.
    let err = prepare("A", &a, "B", &b, &cfg).unwrap_err();
    assert_eq!(err, SensorcastError::InsufficientRows { rows: 1, required: 2 });
}

#[test]
fn empty_auxiliary_stream_aborts() {
    let a = stream(base(), TimeDelta::minutes(1), &[1.0, 2.0]);
    let err = prepare("A", &a, "B", &[], &PipelineConfig::default()).unwrap_err();
    assert_eq!(err, SensorcastError::empty_stream("B"));
}

#[test]
fn invalid_config_is_rejected_before_any_stage() {
    let cfg = PipelineConfig {
        target_horizon: 0,
        ..PipelineConfig::default()
    };
    assert!(matches!(
        prepare("A", &[], "B", &[], &cfg),
        Err(SensorcastError::InvalidArg(_))
    ));
}

#[test]
fn junk_minutes_still_claim_the_nearest_match() {
    let a = vec![
        RawSample::new(base() + TimeDelta::minutes(2), 20.0),
        RawSample::new(base() + TimeDelta::minutes(5), 21.0),
    ];
    // B has one real reading at 14:00; the minutes at 14:03 and 14:06 only
    // carry values that fail coercion, yet each is the nearest key for an A row.
    let b = vec![
        RawSample::new(base(), 60.0),
        RawSample::new(base() + TimeDelta::minutes(3), "n/a"),
        RawSample::new(base() + TimeDelta::minutes(6), ""),
    ];

    let err = prepare("A", &a, "B", &b, &PipelineConfig::default()).unwrap_err();
    assert_eq!(err, SensorcastError::AlignmentFailure { tolerance_secs: 120 });
}
