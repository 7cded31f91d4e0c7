//! Offline fitting of the logistic compatibility model.
//!
//! Training is a pure batch computation: labeled samples in, `ModelWeights` out. Scheduling
//! and publishing the resulting weights belong to whatever job runner invokes it.

mod dataset;
mod labeling;

pub use dataset::{load_samples, load_samples_from_path, DatasetError};
pub use labeling::{label_ride_pair, outcome_points, PairLabel, RideOutcome};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::features::{build_feature_vector, FeatureName, FeatureVector, FEATURE_COUNT};
use super::logistic::{linear_score, sigmoid, ModelWeights};
use super::profile::{HistoricalCounters, UserProfile};

/// Bound applied to the linear term before exponentiation.
const SIGMOID_CLAMP: f64 = 500.0;

/// Feature vector paired with its observed label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: FeatureVector,
    pub label: PairLabel,
}

impl TrainingSample {
    pub fn new(features: FeatureVector, label: PairLabel) -> Self {
        Self { features, label }
    }

    /// Build a sample straight from a historical ride between two riders.
    pub fn from_pair(
        a: &UserProfile,
        b: &UserProfile,
        historical: Option<&HistoricalCounters>,
        outcome: &RideOutcome,
    ) -> Self {
        Self {
            features: build_feature_vector(a, b, historical),
            label: label_ride_pair(outcome),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    pub learning_rate: f64,
    pub epochs: u32,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 100,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrainingError {
    #[error("cannot train on an empty sample set")]
    EmptyDataset,
}

/// Fit model weights with full-batch gradient descent from a zero start.
pub fn train_logistic_regression(
    samples: &[TrainingSample],
    options: TrainingOptions,
) -> Result<ModelWeights, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let count = samples.len() as f64;
    let mut bias = 0.0;
    let mut weights = [0.0_f64; FEATURE_COUNT];

    let initial_error = mean_squared_error(&to_model(bias, &weights), samples);

    for _ in 0..options.epochs {
        let mut gradients = [0.0_f64; FEATURE_COUNT];
        let mut bias_gradient = 0.0;

        for sample in samples {
            let prediction = clamped_sigmoid(dot(bias, &weights, &sample.features));
            let error = prediction - sample.label.target();
            for (slot, (_, value)) in gradients.iter_mut().zip(sample.features.iter()) {
                *slot += error * value;
            }
            bias_gradient += error;
        }

        for (weight, gradient) in weights.iter_mut().zip(gradients) {
            *weight -= options.learning_rate * gradient / count;
        }
        bias -= options.learning_rate * bias_gradient / count;
    }

    let model = to_model(bias, &weights);
    info!(
        samples = samples.len(),
        epochs = options.epochs,
        learning_rate = options.learning_rate,
        initial_error,
        final_error = mean_squared_error(&model, samples),
        "logistic compatibility model trained"
    );

    Ok(model)
}

/// Goodness-of-fit summary for a set of weights over labeled samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    pub sample_count: usize,
    pub mean_squared_error: f64,
    pub accuracy: f64,
}

pub fn evaluate_model(weights: &ModelWeights, samples: &[TrainingSample]) -> ModelEvaluation {
    if samples.is_empty() {
        return ModelEvaluation::default();
    }

    let correct = samples
        .iter()
        .filter(|sample| {
            let predicted = clamped_sigmoid(linear_score(&sample.features, weights)) >= 0.5;
            predicted == (sample.label == PairLabel::Compatible)
        })
        .count();

    ModelEvaluation {
        sample_count: samples.len(),
        mean_squared_error: mean_squared_error(weights, samples),
        accuracy: correct as f64 / samples.len() as f64,
    }
}

/// Mean of `(p - label)^2`; zero for an empty slice.
pub fn mean_squared_error(weights: &ModelWeights, samples: &[TrainingSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: f64 = samples
        .iter()
        .map(|sample| {
            let error =
                clamped_sigmoid(linear_score(&sample.features, weights)) - sample.label.target();
            error * error
        })
        .sum();
    total / samples.len() as f64
}

fn clamped_sigmoid(z: f64) -> f64 {
    sigmoid(z.clamp(-SIGMOID_CLAMP, SIGMOID_CLAMP))
}

fn dot(bias: f64, weights: &[f64; FEATURE_COUNT], features: &FeatureVector) -> f64 {
    weights
        .iter()
        .zip(features.iter())
        .fold(bias, |acc, (weight, (_, value))| acc + weight * value)
}

fn to_model(bias: f64, weights: &[f64; FEATURE_COUNT]) -> ModelWeights {
    ModelWeights {
        bias,
        weights: FeatureName::ALL
            .into_iter()
            .zip(weights.iter())
            .map(|(name, weight)| (name.as_str().to_string(), *weight))
            .collect(),
    }
}
