// ABOUTME: Gradient-boosted regression stumps predicting bpm or calories from derived features
// ABOUTME: Seeded train/test split, shrinkage, and MAE/RMSE/R2 evaluation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitLife Insights

//! Predictive modeling bonus.
//!
//! A small gradient-boosting regressor over depth-1 trees (stumps).
//! Each boosting round fits one stump to the current residuals by
//! minimizing squared error over quantile thresholds, then shrinks its
//! contribution by the learning rate. Missing feature values are imputed
//! with the training-set median.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fitlife_core::models::{DerivedRecord, Metric};

use crate::errors::{AppError, AppResult};

/// Which quantity the model predicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTarget {
    /// Average heart rate
    Bpm,
    /// Calories burned
    Calories,
}

impl ModelTarget {
    fn value(self, r: &DerivedRecord) -> Option<f64> {
        match self {
            Self::Bpm => r.record.bpm,
            Self::Calories => r.record.calories_kcal,
        }
    }

    /// Target name as reported in metrics output
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bpm => "bpm",
            Self::Calories => "calories_kcal",
        }
    }
}

/// Training hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmConfig {
    /// Number of boosting rounds
    pub n_rounds: usize,
    /// Shrinkage applied to each stump's contribution
    pub learning_rate: f64,
    /// Fraction of records held out for evaluation
    pub test_fraction: f64,
    /// Seed for the train/test shuffle
    pub seed: u64,
}

impl Default for GbmConfig {
    fn default() -> Self {
        Self {
            n_rounds: 150,
            learning_rate: 0.1,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Held-out evaluation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalMetrics {
    /// Target the model was trained for
    pub target: String,
    /// Mean absolute error on the test split
    pub mae: f64,
    /// Root mean squared error on the test split
    pub rmse: f64,
    /// Coefficient of determination on the test split
    pub r2: f64,
    /// Training rows
    pub n_train: usize,
    /// Held-out rows
    pub n_test: usize,
}

const FEATURE_NAMES: [&str; 12] = [
    "age",
    "height_cm",
    "weight_kg",
    "duration_min",
    "distance_km",
    "steps",
    "bmi",
    "pace_min_per_km",
    "cadence_steps_per_min",
    "is_runner",
    "is_smoker",
    "is_practitioner",
];

fn feature_row(r: &DerivedRecord) -> Vec<Option<f64>> {
    vec![
        Some(f64::from(r.record.age)),
        r.record.height_cm,
        r.record.weight_kg,
        Metric::Duration.value(r),
        Metric::Distance.value(r),
        Metric::Steps.value(r),
        Metric::Bmi.value(r),
        Metric::Pace.value(r),
        Metric::Cadence.value(r),
        Some(f64::from(u8::from(r.is_runner))),
        Some(f64::from(u8::from(r.is_smoker))),
        Some(f64::from(u8::from(r.is_practitioner))),
    ]
}

/// One regression stump: split on a feature, predict a constant per side.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Stump {
    feature: usize,
    threshold: f64,
    left_value: f64,
    right_value: f64,
}

impl Stump {
    fn predict(&self, row: &[f64]) -> f64 {
        if row[self.feature] <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// A trained gradient-boosting model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbmModel {
    target: ModelTarget,
    base_prediction: f64,
    learning_rate: f64,
    medians: Vec<f64>,
    stumps: Vec<Stump>,
}

impl GbmModel {
    /// Predict the target for one record
    #[must_use]
    pub fn predict(&self, record: &DerivedRecord) -> f64 {
        let row = self.impute(&feature_row(record));
        self.predict_row(&row)
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let boost: f64 = self.stumps.iter().map(|s| s.predict(row)).sum();
        self.learning_rate.mul_add(boost, self.base_prediction)
    }

    fn impute(&self, row: &[Option<f64>]) -> Vec<f64> {
        row.iter()
            .zip(&self.medians)
            .map(|(v, median)| v.unwrap_or(*median))
            .collect()
    }

    /// Target the model predicts
    #[must_use]
    pub const fn target(&self) -> ModelTarget {
        self.target
    }
}

fn median_of(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        f64::midpoint(values[mid - 1], values[mid])
    } else {
        values[mid]
    }
}

fn mean_of(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Candidate thresholds: deciles of the feature's observed values.
fn candidate_thresholds(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    if sorted.len() <= 10 {
        return sorted;
    }
    (1..10)
        .map(|d| sorted[d * sorted.len() / 10])
        .collect()
}

fn fit_stump(rows: &[Vec<f64>], residuals: &[f64]) -> Option<Stump> {
    let n_features = rows.first()?.len();
    let mut best: Option<(f64, Stump)> = None;

    for feature in 0..n_features {
        let column: Vec<f64> = rows.iter().map(|r| r[feature]).collect();
        for threshold in candidate_thresholds(&column) {
            let (mut left, mut right) = (Vec::new(), Vec::new());
            for (value, residual) in column.iter().zip(residuals) {
                if *value <= threshold {
                    left.push(*residual);
                } else {
                    right.push(*residual);
                }
            }
            if left.is_empty() || right.is_empty() {
                continue;
            }
            let left_value = mean_of(&left);
            let right_value = mean_of(&right);
            let sse: f64 = left.iter().map(|r| (r - left_value).powi(2)).sum::<f64>()
                + right.iter().map(|r| (r - right_value).powi(2)).sum::<f64>();
            if best.as_ref().is_none_or(|(best_sse, _)| sse < *best_sse) {
                best = Some((
                    sse,
                    Stump {
                        feature,
                        threshold,
                        left_value,
                        right_value,
                    },
                ));
            }
        }
    }

    best.map(|(_, stump)| stump)
}

/// Train a model and evaluate it on a held-out split.
///
/// Records with an undefined target are excluded up front, mirroring
/// the per-metric exclusion rule of the analyses.
///
/// # Errors
///
/// Returns an error when fewer than ten records carry the target or the
/// held-out split would be empty.
pub fn train_and_evaluate(
    records: &[DerivedRecord],
    target: ModelTarget,
    config: &GbmConfig,
) -> AppResult<(GbmModel, EvalMetrics)> {
    let usable: Vec<&DerivedRecord> = records
        .iter()
        .filter(|r| target.value(r).is_some())
        .collect();
    if usable.len() < 10 {
        return Err(AppError::modeling(format!(
            "need at least 10 records with a {} value, got {}",
            target.name(),
            usable.len()
        )));
    }

    let mut indices: Vec<usize> = (0..usable.len()).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    indices.shuffle(&mut rng);

    let n_test = ((usable.len() as f64) * config.test_fraction).round() as usize;
    let n_test = n_test.clamp(1, usable.len() - 1);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let raw_rows: Vec<Vec<Option<f64>>> = usable.iter().map(|r| feature_row(r)).collect();
    let medians: Vec<f64> = (0..FEATURE_NAMES.len())
        .map(|f| {
            median_of(
                train_idx
                    .iter()
                    .filter_map(|&i| raw_rows[i][f])
                    .collect::<Vec<f64>>(),
            )
        })
        .collect();
    let impute = |row: &[Option<f64>]| -> Vec<f64> {
        row.iter()
            .zip(&medians)
            .map(|(v, m)| v.unwrap_or(*m))
            .collect()
    };

    let train_rows: Vec<Vec<f64>> = train_idx.iter().map(|&i| impute(&raw_rows[i])).collect();
    let train_targets: Vec<f64> = train_idx
        .iter()
        .filter_map(|&i| target.value(usable[i]))
        .collect();

    let base_prediction = mean_of(&train_targets);
    let mut predictions = vec![base_prediction; train_rows.len()];
    let mut stumps = Vec::with_capacity(config.n_rounds);

    for round in 0..config.n_rounds {
        let residuals: Vec<f64> = train_targets
            .iter()
            .zip(&predictions)
            .map(|(y, p)| y - p)
            .collect();
        let Some(stump) = fit_stump(&train_rows, &residuals) else {
            debug!(round, "no further split improves the fit, stopping early");
            break;
        };
        for (prediction, row) in predictions.iter_mut().zip(&train_rows) {
            *prediction += config.learning_rate * stump.predict(row);
        }
        stumps.push(stump);
    }

    let model = GbmModel {
        target,
        base_prediction,
        learning_rate: config.learning_rate,
        medians,
        stumps,
    };

    let test_targets: Vec<f64> = test_idx
        .iter()
        .filter_map(|&i| target.value(usable[i]))
        .collect();
    let test_predictions: Vec<f64> = test_idx
        .iter()
        .map(|&i| model.predict_row(&model.impute(&raw_rows[i])))
        .collect();
    let metrics = evaluate(target, &test_targets, &test_predictions, train_idx.len());

    info!(
        target = target.name(),
        rounds = model.stumps.len(),
        mae = metrics.mae,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "trained gradient-boosting model"
    );
    Ok((model, metrics))
}

fn evaluate(
    target: ModelTarget,
    actual: &[f64],
    predicted: &[f64],
    n_train: usize,
) -> EvalMetrics {
    let n = actual.len() as f64;
    let mae = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).abs())
        .sum::<f64>()
        / n;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum::<f64>()
        / n;
    let mean_actual = mean_of(actual);
    let ss_total: f64 = actual.iter().map(|y| (y - mean_actual).powi(2)).sum();
    let ss_residual: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(y, p)| (y - p).powi(2))
        .sum();
    let r2 = if ss_total > 0.0 {
        1.0 - ss_residual / ss_total
    } else {
        0.0
    };

    EvalMetrics {
        target: target.name().to_owned(),
        mae,
        rmse: mse.sqrt(),
        r2,
        n_train,
        n_test: actual.len(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;
    use fitlife_core::models::{DataSource, Record};
    use fitlife_core::AnalysisConfig;
    use fitlife_intelligence::derive_all;

    fn synthetic_dataset(n: usize) -> Vec<DerivedRecord> {
        // bpm rises linearly with duration so the model has signal to find.
        let records: Vec<Record> = (0..n)
            .map(|i| {
                let duration = 20.0 + (i as f64 % 40.0);
                Record {
                    id: format!("r{i}"),
                    timestamp: Utc::now(),
                    age: 20 + (i as u32 % 50),
                    gender: None,
                    height_cm: Some(170.0),
                    weight_kg: Some(70.0),
                    bpm: Some(2.0f64.mul_add(duration, 80.0)),
                    calories_kcal: Some(10.0 * duration),
                    steps: Some(4000),
                    duration_min: Some(duration),
                    distance_km: Some(duration / 6.0),
                    activity: Some("Running".to_owned()),
                    smoking_level: None,
                    health_condition: None,
                    source: DataSource::Public,
                }
            })
            .collect();
        derive_all(&records, &AnalysisConfig::default())
    }

    #[test]
    fn model_learns_a_linear_relationship() {
        let records = synthetic_dataset(120);
        let (_, metrics) =
            train_and_evaluate(&records, ModelTarget::Bpm, &GbmConfig::default()).unwrap();
        assert!(metrics.r2 > 0.8, "r2 was {}", metrics.r2);
        assert!(metrics.mae < 10.0, "mae was {}", metrics.mae);
    }

    #[test]
    fn training_is_deterministic_for_a_fixed_seed() {
        let records = synthetic_dataset(80);
        let config = GbmConfig::default();
        let (_, first) = train_and_evaluate(&records, ModelTarget::Calories, &config).unwrap();
        let (_, second) = train_and_evaluate(&records, ModelTarget::Calories, &config).unwrap();
        assert!((first.mae - second.mae).abs() < 1e-12);
        assert!((first.r2 - second.r2).abs() < 1e-12);
    }

    #[test]
    fn too_few_records_with_target_is_an_error() {
        let records = synthetic_dataset(5);
        let err =
            train_and_evaluate(&records, ModelTarget::Bpm, &GbmConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::Modeling(_)));
    }

    #[test]
    fn predict_imputes_missing_features_from_training_medians() {
        let records = synthetic_dataset(60);
        let (model, _) =
            train_and_evaluate(&records, ModelTarget::Bpm, &GbmConfig::default()).unwrap();

        let sparse = Record {
            id: "sparse".to_owned(),
            timestamp: Utc::now(),
            age: 35,
            gender: None,
            height_cm: None,
            weight_kg: None,
            bpm: None,
            calories_kcal: None,
            steps: None,
            duration_min: None,
            distance_km: None,
            activity: None,
            smoking_level: None,
            health_condition: None,
            source: DataSource::Public,
        };
        let derived = fitlife_intelligence::derive_record(&sparse, &AnalysisConfig::default());
        let prediction = model.predict(&derived);
        assert!(prediction.is_finite());
        // The imputed row sits inside the training feature space, so the
        // prediction stays inside the observed target range too.
        assert!((70.0..=250.0).contains(&prediction), "prediction {prediction}");
    }

    #[test]
    fn prediction_stays_near_the_observed_range() {
        let records = synthetic_dataset(100);
        let (model, _) =
            train_and_evaluate(&records, ModelTarget::Bpm, &GbmConfig::default()).unwrap();
        let prediction = model.predict(&records[0]);
        assert!((70.0..=250.0).contains(&prediction));
    }
}
