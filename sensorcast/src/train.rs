//! Training/evaluation driver: baseline regressors, chronological holdout
//! scoring, and the metrics file hand-off.

use std::path::Path;

use sensorcast_core::{
    EvaluationConfig, MetricsRecord, ModelReport, SensorcastError, StreamSpec, TrainingFrame,
};

use crate::core::Sensorcast;

/// Name of the metric reported by [`evaluate`].
pub const METRIC_MAE: &str = "MAE";

/// A model over `[value_a, value_b]` feature rows.
pub trait Regressor: Send {
    /// Model name written to the metrics record.
    fn name(&self) -> &str;

    /// Fit the model to features and targets of equal length.
    ///
    /// # Errors
    /// Returns an error if the inputs are empty or mismatched.
    fn fit(&mut self, features: &[[f64; 2]], targets: &[f64]) -> Result<(), SensorcastError>;

    /// Predict one value per feature row.
    ///
    /// # Errors
    /// Returns an error if the model has not been fitted.
    fn predict(&self, features: &[[f64; 2]]) -> Result<Vec<f64>, SensorcastError>;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool;
}

fn check_fit_inputs(features: &[[f64; 2]], targets: &[f64]) -> Result<(), SensorcastError> {
    if features.len() != targets.len() {
        return Err(SensorcastError::InvalidArg(format!(
            "features and targets differ in length: {} vs {}",
            features.len(),
            targets.len()
        )));
    }
    if features.is_empty() {
        return Err(SensorcastError::InsufficientRows {
            rows: 0,
            required: 1,
        });
    }
    Ok(())
}

fn not_fitted(name: &str) -> SensorcastError {
    SensorcastError::InvalidArg(format!("{name} must be fitted before predicting"))
}

/// Predicts that the next target value equals the current one.
#[derive(Debug, Clone, Default)]
pub struct PersistenceRegressor {
    fitted: bool,
}

impl PersistenceRegressor {
    /// Create an unfitted persistence baseline.
    #[must_use]
    pub const fn new() -> Self {
        Self { fitted: false }
    }
}

impl Regressor for PersistenceRegressor {
    fn name(&self) -> &str {
        "Persistence"
    }

    fn fit(&mut self, features: &[[f64; 2]], targets: &[f64]) -> Result<(), SensorcastError> {
        check_fit_inputs(features, targets)?;
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, features: &[[f64; 2]]) -> Result<Vec<f64>, SensorcastError> {
        if !self.fitted {
            return Err(not_fitted(self.name()));
        }
        Ok(features.iter().map(|f| f[0]).collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

/// Ordinary least squares on both features with an intercept.
///
/// Fits `y = intercept + w0 * value_a + w1 * value_b`. When the features are
/// collinear or constant, the affected weight is set to zero and the fit
/// degrades to one feature or to the target mean.
#[derive(Debug, Clone, Default)]
pub struct LinearRegressor {
    intercept: f64,
    weights: [f64; 2],
    fitted: bool,
}

impl LinearRegressor {
    const EPS: f64 = 1e-12;

    /// Create an unfitted linear model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            intercept: 0.0,
            weights: [0.0; 2],
            fitted: false,
        }
    }

    /// Fitted intercept.
    #[must_use]
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fitted feature weights `[w_value_a, w_value_b]`.
    #[must_use]
    pub const fn weights(&self) -> [f64; 2] {
        self.weights
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        "LinearRegression"
    }

    #[allow(clippy::cast_precision_loss)]
    fn fit(&mut self, features: &[[f64; 2]], targets: &[f64]) -> Result<(), SensorcastError> {
        check_fit_inputs(features, targets)?;
        let n = features.len() as f64;
        let mean_x = [
            features.iter().map(|f| f[0]).sum::<f64>() / n,
            features.iter().map(|f| f[1]).sum::<f64>() / n,
        ];
        let mean_y = targets.iter().sum::<f64>() / n;

        // centered second moments
        let (mut s00, mut s01, mut s11, mut s0y, mut s1y) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for (f, y) in features.iter().zip(targets) {
            let (d0, d1, dy) = (f[0] - mean_x[0], f[1] - mean_x[1], y - mean_y);
            s00 += d0 * d0;
            s01 += d0 * d1;
            s11 += d1 * d1;
            s0y += d0 * dy;
            s1y += d1 * dy;
        }

        let det = s00.mul_add(s11, -(s01 * s01));
        self.weights = if det.abs() > Self::EPS * (s00 * s11).max(1.0) {
            [
                s11.mul_add(s0y, -(s01 * s1y)) / det,
                s00.mul_add(s1y, -(s01 * s0y)) / det,
            ]
        } else if s00 > Self::EPS {
            [s0y / s00, 0.0]
        } else if s11 > Self::EPS {
            [0.0, s1y / s11]
        } else {
            [0.0, 0.0]
        };
        self.intercept = self.weights[1].mul_add(
            -mean_x[1],
            self.weights[0].mul_add(-mean_x[0], mean_y),
        );
        self.fitted = true;
        Ok(())
    }

    fn predict(&self, features: &[[f64; 2]]) -> Result<Vec<f64>, SensorcastError> {
        if !self.fitted {
            return Err(not_fitted(self.name()));
        }
        Ok(features
            .iter()
            .map(|f| {
                self.weights[1].mul_add(f[1], self.weights[0].mul_add(f[0], self.intercept))
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

/// Mean absolute error between two equal-length slices.
///
/// # Errors
/// Returns `InvalidArg` when the slices are empty or differ in length.
#[allow(clippy::cast_precision_loss)]
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> Result<f64, SensorcastError> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(SensorcastError::InvalidArg(format!(
            "cannot score {} predictions against {} actuals",
            predicted.len(),
            actual.len()
        )));
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    Ok(total / actual.len() as f64)
}

/// Number of trailing rows held out for scoring, or `None` for in-sample scoring.
///
/// `max(1, round(rows * fraction))` with ties rounded to even, capped so at
/// least one training row remains.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn holdout_size(rows: usize, cfg: &EvaluationConfig) -> Option<usize> {
    if rows < cfg.min_rows_for_holdout.max(2) {
        return None;
    }
    let test = (rows as f64 * cfg.holdout_fraction).round_ties_even().max(1.0) as usize;
    Some(test.min(rows - 1))
}

/// Fit `regressor` and score it chronologically on `frame`.
///
/// Frames shorter than `cfg.min_rows_for_holdout` are fit and scored on every
/// row (`in_sample` is set). Otherwise the last `holdout_size` rows form the
/// test set and the rest the training set; rows are never shuffled.
///
/// # Errors
/// Returns `InsufficientRows` for an empty frame, or whatever the regressor reports.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "sensorcast::train::evaluate",
        skip(regressor, frame, cfg, auxiliary),
        fields(model = regressor.name(), rows = frame.len()),
    )
)]
pub fn evaluate<R: Regressor + ?Sized>(
    regressor: &mut R,
    frame: &TrainingFrame,
    cfg: &EvaluationConfig,
    auxiliary: &StreamSpec,
) -> Result<ModelReport, SensorcastError> {
    if frame.is_empty() {
        return Err(SensorcastError::InsufficientRows {
            rows: 0,
            required: 1,
        });
    }
    let features = frame.features();
    let targets = frame.targets();

    let (split, in_sample) = match holdout_size(frame.len(), cfg) {
        Some(test) => (frame.len() - test, false),
        None => (0, true),
    };
    let (train_x, train_y, test_x, test_y) = if in_sample {
        (&features[..], &targets[..], &features[..], &targets[..])
    } else {
        (
            &features[..split],
            &targets[..split],
            &features[split..],
            &targets[split..],
        )
    };

    regressor.fit(train_x, train_y)?;
    let predicted = regressor.predict(test_x)?;
    let value = mean_absolute_error(test_y, &predicted)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        train = train_x.len(),
        test = test_x.len(),
        in_sample,
        mae = value,
        "evaluated model"
    );

    Ok(ModelReport {
        metrics: MetricsRecord {
            model: regressor.name().to_string(),
            metric: METRIC_MAE.to_string(),
            value,
            aux_sensor_id: auxiliary.sensor_id,
            aux_label: auxiliary.label.clone(),
        },
        train_rows: train_x.len(),
        test_rows: test_x.len(),
        in_sample,
        predictions: test_y.iter().copied().zip(predicted).collect(),
    })
}

/// Write the metrics record as pretty JSON, replacing any existing file.
///
/// # Errors
/// Returns `Io` if the file cannot be written and `Data` if encoding fails.
pub fn write_metrics(path: impl AsRef<Path>, record: &MetricsRecord) -> Result<(), SensorcastError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| SensorcastError::Data(format!("failed to encode metrics: {e}")))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Read a metrics record written by [`write_metrics`].
///
/// # Errors
/// Returns `Io` if the file cannot be read and `Data` if it is not a metrics record.
pub fn read_metrics(path: impl AsRef<Path>) -> Result<MetricsRecord, SensorcastError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| SensorcastError::Data(format!("malformed metrics file: {e}")))
}

impl Sensorcast {
    /// Prepare the training frame over `window` and evaluate `regressor` on it.
    ///
    /// # Errors
    /// Propagates preparation errors (see [`Sensorcast::prepare_training`])
    /// and evaluation errors.
    pub async fn train<R: Regressor + ?Sized>(
        &self,
        window: &sensorcast_core::TimeWindow,
        regressor: &mut R,
    ) -> Result<ModelReport, SensorcastError> {
        let prepared = self.prepare_training(window).await?;
        evaluate(
            regressor,
            &prepared.training,
            &self.cfg.evaluation,
            &self.cfg.auxiliary,
        )
    }
}
