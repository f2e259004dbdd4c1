mod helpers;

use chrono::TimeDelta;
use helpers::*;
use proptest::prelude::*;
use sensorcast_mock::{DynamicMockSource, MockBehavior};
use sensorcast::{
    EvaluationConfig, LinearRegressor, MetricsRecord, PersistenceRegressor, Regressor,
    SensorcastError, StreamSpec, TimeWindow, TrainingFrame, TrainingRow, evaluate, holdout_size,
    mean_absolute_error, read_metrics, write_metrics,
};

fn frame_from(rows: &[(f64, f64, f64)]) -> TrainingFrame {
    let start = dt(2025, 3, 1, 14, 0, 0);
    TrainingFrame {
        rows: rows
            .iter()
            .enumerate()
            .map(|(i, &(a, b, t))| TrainingRow {
                bucket: start + TimeDelta::minutes(i64::try_from(i).unwrap()),
                value_a: a,
                value_b: b,
                target: t,
            })
            .collect(),
        horizon: 1,
    }
}

fn humidity() -> StreamSpec {
    StreamSpec::new(2, "HUMIDITY")
}

#[test]
fn holdout_size_follows_quarter_split() {
    let cfg = EvaluationConfig::default();
    assert_eq!(holdout_size(0, &cfg), None);
    assert_eq!(holdout_size(9, &cfg), None);
    // 2.5 rounds to even
    assert_eq!(holdout_size(10, &cfg), Some(2));
    // 3.5 rounds to even
    assert_eq!(holdout_size(14, &cfg), Some(4));
    assert_eq!(holdout_size(100, &cfg), Some(25));
}

#[test]
fn holdout_size_keeps_a_training_row() {
    let cfg = EvaluationConfig {
        holdout_fraction: 0.99,
        min_rows_for_holdout: 0,
    };
    assert_eq!(holdout_size(1, &cfg), None);
    assert_eq!(holdout_size(2, &cfg), Some(1));
    assert_eq!(holdout_size(50, &cfg), Some(49));
}

#[test]
fn linear_regressor_recovers_exact_relation() {
    let features: Vec<[f64; 2]> = (0..12)
        .map(|i| {
            let x = f64::from(i);
            [20.0 + 0.5 * x, 60.0 - (x * 0.7).sin()]
        })
        .collect();
    let targets: Vec<f64> = features
        .iter()
        .map(|f| 1.5 + 0.8 * f[0] - 0.3 * f[1])
        .collect();

    let mut model = LinearRegressor::new();
    assert!(!model.is_fitted());
    model.fit(&features, &targets).unwrap();
    assert!(model.is_fitted());
    assert!((model.intercept() - 1.5).abs() < 1e-6);
    assert!((model.weights()[0] - 0.8).abs() < 1e-6);
    assert!((model.weights()[1] + 0.3).abs() < 1e-6);

    let predicted = model.predict(&features).unwrap();
    assert!(mean_absolute_error(&targets, &predicted).unwrap() < 1e-6);
}

#[test]
fn linear_regressor_handles_constant_auxiliary() {
    let features: Vec<[f64; 2]> = (0..5).map(|i| [f64::from(i), 50.0]).collect();
    let targets: Vec<f64> = features.iter().map(|f| 2.0 * f[0] + 1.0).collect();

    let mut model = LinearRegressor::new();
    model.fit(&features, &targets).unwrap();
    assert!((model.weights()[0] - 2.0).abs() < 1e-9);
    assert!(model.weights()[1].abs() < 1e-12);
    assert!((model.intercept() - 1.0).abs() < 1e-9);
}

#[test]
fn unfitted_models_refuse_to_predict() {
    let err = LinearRegressor::new().predict(&[[1.0, 2.0]]).unwrap_err();
    assert!(matches!(err, SensorcastError::InvalidArg(_)));
    let err = PersistenceRegressor::new().predict(&[[1.0, 2.0]]).unwrap_err();
    assert!(matches!(err, SensorcastError::InvalidArg(_)));
}

#[test]
fn fit_rejects_mismatched_inputs() {
    let err = LinearRegressor::new()
        .fit(&[[1.0, 2.0]], &[1.0, 2.0])
        .unwrap_err();
    assert!(matches!(err, SensorcastError::InvalidArg(_)));
}

#[test]
fn persistence_predicts_current_value() {
    let mut model = PersistenceRegressor::new();
    model.fit(&[[1.0, 9.0]], &[2.0]).unwrap();
    assert_eq!(model.predict(&[[3.0, 9.0], [4.5, 0.0]]).unwrap(), vec![3.0, 4.5]);
}

#[test]
fn small_frames_are_scored_in_sample() {
    let frame = frame_from(&[(1.0, 10.0, 2.0), (2.0, 20.0, 3.0), (3.0, 30.0, 4.0)]);
    let mut model = PersistenceRegressor::new();
    let report = evaluate(&mut model, &frame, &EvaluationConfig::default(), &humidity()).unwrap();
    assert!(report.in_sample);
    assert_eq!(report.train_rows, 3);
    assert_eq!(report.test_rows, 3);
    assert!((report.metrics.value - 1.0).abs() < 1e-12);
    assert_eq!(report.metrics.model, "Persistence");
    assert_eq!(report.metrics.metric, "MAE");
    assert_eq!(report.metrics.aux_sensor_id, 2);
    assert_eq!(report.metrics.aux_label, "HUMIDITY");
}

#[test]
fn larger_frames_hold_out_the_tail() {
    let rows: Vec<(f64, f64, f64)> = (0..14)
        .map(|i| {
            let x = f64::from(i);
            (x, 2.0 * x, x + 1.0)
        })
        .collect();
    let frame = frame_from(&rows);
    let mut model = LinearRegressor::new();
    let report = evaluate(&mut model, &frame, &EvaluationConfig::default(), &humidity()).unwrap();
    assert!(!report.in_sample);
    assert_eq!(report.train_rows, 10);
    assert_eq!(report.test_rows, 4);
    // held-out actuals are the last four targets, in order
    let actuals: Vec<f64> = report.predictions.iter().map(|(a, _)| *a).collect();
    assert_eq!(actuals, vec![11.0, 12.0, 13.0, 14.0]);
    assert!(report.metrics.value < 1e-6);
}

#[test]
fn empty_frame_is_insufficient() {
    let frame = frame_from(&[]);
    let err = evaluate(
        &mut LinearRegressor::new(),
        &frame,
        &EvaluationConfig::default(),
        &humidity(),
    )
    .unwrap_err();
    assert!(err.is_insufficient_data());
}

#[test]
fn metrics_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    let record = MetricsRecord {
        model: "LinearRegression".into(),
        metric: "MAE".into(),
        value: 0.4125,
        aux_sensor_id: 2,
        aux_label: "HUMIDITY".into(),
    };
    write_metrics(&path, &record).unwrap();
    assert_eq!(read_metrics(&path).unwrap(), record);

    std::fs::write(&path, "{\"model\": 3}").unwrap();
    assert!(matches!(read_metrics(&path), Err(SensorcastError::Data(_))));
    assert!(matches!(
        read_metrics(dir.path().join("missing.json")),
        Err(SensorcastError::Io(_))
    ));
}

#[tokio::test]
async fn train_on_fixture_streams() {
    let sc = builder(TEMP, HUMIDITY).with_source(mock()).build().unwrap();
    let mut model = LinearRegressor::new();
    let report = sc.train(&TimeWindow::all(), &mut model).await.unwrap();
    // nine training rows sit below the holdout minimum
    assert!(report.in_sample);
    assert_eq!(report.train_rows, 9);
    assert_eq!(report.metrics.aux_label, "AUX");
    assert!(report.metrics.value.is_finite());
}

#[tokio::test]
async fn train_surfaces_insufficient_data() {
    let sc = builder(TEMP, BLANK).with_source(mock()).build().unwrap();
    let err = sc
        .train(&TimeWindow::all(), &mut PersistenceRegressor::new())
        .await
        .unwrap_err();
    assert!(err.is_insufficient_data());
}

proptest! {
    #[test]
    fn persistence_error_matches_mean_step(values in prop::collection::vec(-50.0f64..50.0, 2..40)) {
        let report = tokio_test::block_on(async {
            let (src, ctrl) = DynamicMockSource::new_with_controller("P0");
            let start = dt(2025, 3, 1, 14, 0, 0);
            ctrl.set_fetch_behavior(TEMP, MockBehavior::Return(samples(start, TimeDelta::minutes(1), &values)))
                .await;
            ctrl.set_fetch_behavior(
                HUMIDITY,
                MockBehavior::Return(samples(start, TimeDelta::minutes(1), &vec![55.0; values.len()])),
            )
            .await;
            let sc = builder(TEMP, HUMIDITY)
                .with_source(src)
                .evaluation(EvaluationConfig { holdout_fraction: 0.25, min_rows_for_holdout: usize::MAX })
                .build()
                .unwrap();
            sc.train(&TimeWindow::all(), &mut PersistenceRegressor::new()).await
        })
        .unwrap();

        #[allow(clippy::cast_precision_loss)]
        let expected = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>()
            / (values.len() - 1) as f64;
        prop_assert!(report.in_sample);
        prop_assert_eq!(report.train_rows, values.len() - 1);
        prop_assert!((report.metrics.value - expected).abs() < 1e-9);
    }

    #[test]
    fn holdout_leaves_training_rows(rows in 0usize..500, frac in 0.01f64..0.99) {
        let cfg = EvaluationConfig { holdout_fraction: frac, min_rows_for_holdout: 10 };
        match holdout_size(rows, &cfg) {
            None => prop_assert!(rows < 10),
            Some(test) => {
                prop_assert!(test >= 1);
                prop_assert!(test < rows);
            }
        }
    }
}
