use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sensorcast_core::{
    AlignConfig, BucketMean, ExactJoin, JoinDirection, JoinMethod, ResampledSeries,
    SensorcastError, align, exact_join, outer_join, tolerance_join,
};

fn at(m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, m, s).unwrap()
}

fn series(label: &str, pts: &[(DateTime<Utc>, Option<f64>)]) -> ResampledSeries {
    ResampledSeries::from_points(
        label,
        pts.iter()
            .map(|&(bucket, mean)| BucketMean {
                bucket,
                mean,
                count: usize::from(mean.is_some()),
            })
            .collect(),
    )
}

#[test]
fn outer_join_keeps_every_key_in_order() {
    let a = series("A", &[(at(2, 0), Some(1.0)), (at(0, 0), Some(0.0))]);
    let b = series("B", &[(at(1, 0), Some(10.0)), (at(2, 0), Some(12.0))]);
    let rows = outer_join(&a, &b);
    let keys: Vec<_> = rows.iter().map(|r| r.bucket).collect();
    assert_eq!(keys, vec![at(0, 0), at(1, 0), at(2, 0)]);
    assert_eq!(rows[0].value_b, None);
    assert_eq!(rows[1].value_a, None);
    assert_eq!(rows[2].complete(), Some((1.0, 12.0)));
}

#[test]
fn exact_join_takes_precedence_over_fallback() {
    // One exact match plus a near miss that the fallback would have paired.
    let a = series("A", &[(at(0, 0), Some(1.0)), (at(5, 0), Some(2.0))]);
    let b = series("B", &[(at(0, 0), Some(10.0)), (at(6, 0), Some(20.0))]);
    assert!(matches!(exact_join(&a, &b), ExactJoin::Joined(_)));

    let frame = align(&a, &b, &AlignConfig::default()).unwrap();
    assert_eq!(frame.method, JoinMethod::Exact);
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.rows[0].bucket, at(0, 0));
    assert_eq!((frame.rows[0].value_a, frame.rows[0].value_b), (1.0, 10.0));
}

#[test]
fn exact_join_with_only_partial_rows_is_unjoinable() {
    let a = series("A", &[(at(0, 0), Some(1.0)), (at(1, 0), None)]);
    let b = series("B", &[(at(1, 0), Some(10.0))]);
    assert_eq!(exact_join(&a, &b), ExactJoin::Unjoinable);
}

#[test]
fn tolerance_boundary_is_inclusive() {
    let a = series("A", &[(at(0, 0), Some(1.0))]);

    let b = series("B", &[(at(2, 0), Some(5.0))]);
    let frame = align(&a, &b, &AlignConfig::default()).unwrap();
    assert_eq!(frame.method, JoinMethod::Nearest);
    assert_eq!(frame.rows[0].value_b, 5.0);
    assert_eq!(frame.rows[0].bucket, at(0, 0));

    let b = series("B", &[(at(2, 1), Some(5.0))]);
    let err = align(&a, &b, &AlignConfig::default()).unwrap_err();
    assert_eq!(err, SensorcastError::AlignmentFailure { tolerance_secs: 120 });
    assert!(err.is_insufficient_data());
}

#[test]
fn unpairable_streams_fail_alignment() {
    let a = series("A", &[(at(0, 0), Some(1.0)), (at(1, 0), Some(2.0))]);
    let b = series("B", &[(at(30, 0), Some(5.0)), (at(40, 0), Some(6.0))]);
    assert!(matches!(
        align(&a, &b, &AlignConfig::default()),
        Err(SensorcastError::AlignmentFailure { .. })
    ));
}

#[test]
fn nearest_tie_prefers_earlier_row() {
    let a = series("A", &[(at(1, 0), Some(1.0))]);
    let b = series("B", &[(at(0, 0), Some(10.0)), (at(2, 0), Some(20.0))]);
    let rows = tolerance_join(&a, &b, &AlignConfig::default());
    assert_eq!(rows[0].value_b, Some(10.0));
}

#[test]
fn directions_pick_their_side() {
    let a = series("A", &[(at(5, 0), Some(1.0))]);
    let b = series("B", &[(at(4, 0), Some(4.0)), (at(5, 30), Some(55.0))]);
    let cfg = |direction| AlignConfig {
        direction,
        tolerance_secs: 120,
    };
    let pick = |d| tolerance_join(&a, &b, &cfg(d))[0].value_b;
    assert_eq!(pick(JoinDirection::Nearest), Some(55.0));
    assert_eq!(pick(JoinDirection::Backward), Some(4.0));
    assert_eq!(pick(JoinDirection::Forward), Some(55.0));
}

#[test]
fn unmatched_rows_keep_missing_value_b() {
    let a = series("A", &[(at(0, 0), Some(1.0)), (at(10, 0), Some(2.0))]);
    let b = series("B", &[(at(1, 0), Some(5.0))]);
    let rows = tolerance_join(&a, &b, &AlignConfig::default());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].value_b, Some(5.0));
    assert_eq!(rows[1].value_b, None);

    let frame = align(&a, &b, &AlignConfig::default()).unwrap();
    assert_eq!(frame.len(), 1);
}

#[test]
fn zero_tolerance_fallback_never_pairs_distinct_keys() {
    let a = series("A", &[(at(0, 0), Some(1.0))]);
    let b = series("B", &[(at(0, 0) + TimeDelta::minutes(1), Some(5.0))]);
    let cfg = AlignConfig {
        tolerance_secs: 0,
        ..AlignConfig::default()
    };
    assert!(align(&a, &b, &cfg).is_err());
}
