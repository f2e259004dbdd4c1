mod helpers;

use chrono::TimeDelta;
use helpers::*;
use sensorcast::{
    MetricsRecord, RawSample, SensorcastError, TimeWindow, build_snapshot, write_metrics,
};
use sensorcast_core::{Bucketing, Sample, resample_mean};
use sensorcast_mock::{DynamicMockSource, MockBehavior, fixture_origin};

#[tokio::test]
async fn snapshot_summarizes_fixture_window() {
    let sc = builder(TEMP, HUMIDITY).with_source(mock()).build().unwrap();
    let report = sc.dashboard(&TimeWindow::all(), 26.0).await.unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.model, None);

    let snap = report.snapshot;
    assert_eq!(snap.target_label, "TEMP");
    assert_eq!(snap.aux_label, "AUX");
    assert_eq!(snap.rows, 10);
    assert!(approx(snap.target_min.unwrap(), 24.2));
    assert!(approx(snap.target_max.unwrap(), 27.1));
    assert!(approx(snap.target_mean.unwrap(), 25.785));
    assert!(approx(snap.aux_mean.unwrap(), 59.1));

    assert_eq!(snap.alert_count(), 5);
    let first = snap.alerts[0];
    assert_eq!(first.bucket, fixture_origin() + TimeDelta::minutes(5));
    assert!(approx(first.value, 26.1));
}

#[tokio::test]
async fn threshold_is_strict() {
    let sc = builder(TEMP, HUMIDITY).with_source(mock()).build().unwrap();
    // hottest minute averages 27.1
    let report = sc.dashboard(&TimeWindow::all(), 27.2).await.unwrap();
    assert_eq!(report.snapshot.alert_count(), 0);
}

#[tokio::test]
async fn empty_auxiliary_is_a_warning() {
    let sc = builder(TEMP, BLANK).with_source(mock()).build().unwrap();
    let report = sc.dashboard(&TimeWindow::all(), 26.0).await.unwrap();
    assert_eq!(report.warnings, vec![SensorcastError::empty_stream("AUX")]);
    assert_eq!(report.snapshot.rows, 10);
    assert_eq!(report.snapshot.aux_mean, None);
    assert!(report.snapshot.target_mean.is_some());
}

#[tokio::test]
async fn window_without_data_is_an_error() {
    let sc = builder(TEMP, HUMIDITY).with_source(mock()).build().unwrap();
    let window = TimeWindow::between(
        fixture_origin() - TimeDelta::days(1),
        fixture_origin() - TimeDelta::hours(23),
    );
    let err = sc.dashboard(&window, 26.0).await.unwrap_err();
    assert_eq!(err, SensorcastError::empty_stream("TEMP and AUX"));
    assert!(err.is_insufficient_data());
}

#[tokio::test]
async fn disjoint_streams_are_listed_side_by_side() {
    let sc = builder(MOISTURE_EVEN, PH_ODD)
        .with_source(mock())
        .build()
        .unwrap();
    let snap = sc.dashboard(&TimeWindow::all(), 100.0).await.unwrap().snapshot;
    assert_eq!(snap.rows, 10);
    assert!(snap.alerts.is_empty());
}

#[test]
fn build_snapshot_without_auxiliary() {
    let start = dt(2025, 6, 1, 8, 0, 0);
    let samples: Vec<Sample> = [29.0, 27.5, 28.5]
        .iter()
        .enumerate()
        .map(|(i, &v)| Sample {
            ts: start + TimeDelta::minutes(i64::try_from(i).unwrap()),
            value: Some(v),
        })
        .collect();
    let target = resample_mean("TEMP", &samples, &Bucketing::default()).unwrap();
    let aux = sensorcast::ResampledSeries::from_points("AUX", vec![]);

    let snap = build_snapshot(&target, &aux, 28.0);
    assert_eq!(snap.rows, 3);
    assert_eq!(snap.alert_count(), 2);
    assert_eq!(snap.alerts[1].bucket, start + TimeDelta::minutes(2));
    assert_eq!(snap.aux_mean, None);
}

#[tokio::test]
async fn junk_only_minutes_still_count_as_rows() {
    let start = dt(2025, 6, 1, 8, 0, 0);
    let (src, ctrl) = DynamicMockSource::new_with_controller("P0");
    ctrl.set_fetch_behavior(
        TEMP,
        MockBehavior::Return(vec![
            RawSample::new(start, 25.0),
            RawSample::new(start + TimeDelta::minutes(1), "29,0"),
            RawSample::new(start + TimeDelta::minutes(2), "n/a"),
        ]),
    )
    .await;
    ctrl.set_fetch_behavior(
        HUMIDITY,
        MockBehavior::Return(samples(start, TimeDelta::minutes(1), &[50.0, 51.0, 52.0])),
    )
    .await;

    let sc = builder(TEMP, HUMIDITY).with_source(src).build().unwrap();
    let snap = sc.dashboard(&TimeWindow::all(), 28.0).await.unwrap().snapshot;
    assert_eq!(snap.rows, 3);
    assert!(approx(snap.target_mean.unwrap(), 27.0));
    assert!(approx(snap.target_max.unwrap(), 29.0));
    assert_eq!(snap.alert_count(), 1);
    assert_eq!(snap.alerts[0].bucket, start + TimeDelta::minutes(1));
}

fn record() -> MetricsRecord {
    MetricsRecord {
        model: "LinearRegression".into(),
        metric: "MAE".into(),
        value: 0.318,
        aux_sensor_id: 2,
        aux_label: "AUX".into(),
    }
}

#[tokio::test]
async fn dashboard_shows_latest_model_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    write_metrics(&path, &record()).unwrap();

    let sc = builder(TEMP, HUMIDITY)
        .with_source(mock())
        .metrics_path(&path)
        .build()
        .unwrap();
    let report = sc.dashboard(&TimeWindow::all(), 26.0).await.unwrap();
    assert_eq!(report.model, Some(record()));
    assert!(report.warnings.is_empty());
}

#[tokio::test]
async fn missing_metrics_file_asks_for_training() {
    let dir = tempfile::tempdir().unwrap();
    let sc = builder(TEMP, HUMIDITY)
        .with_source(mock())
        .metrics_path(dir.path().join("metrics.json"))
        .build()
        .unwrap();
    let report = sc.dashboard(&TimeWindow::all(), 26.0).await.unwrap();
    assert_eq!(report.model, None);
    assert_eq!(report.snapshot.rows, 10);
    match report.warnings.as_slice() {
        [SensorcastError::NotFound { what }] => assert!(what.contains("train the model first")),
        other => panic!("unexpected warnings: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_metrics_file_is_a_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    std::fs::write(&path, "{\"model\": 3}").unwrap();
    let sc = builder(TEMP, HUMIDITY)
        .with_source(mock())
        .metrics_path(&path)
        .build()
        .unwrap();
    let report = sc.dashboard(&TimeWindow::all(), 26.0).await.unwrap();
    assert_eq!(report.model, None);
    assert!(matches!(report.warnings.as_slice(), [SensorcastError::Data(_)]));
}
