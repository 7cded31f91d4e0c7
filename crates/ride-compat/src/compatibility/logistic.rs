use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::features::{build_feature_vector, FeatureName, FeatureVector};
use super::profile::{HistoricalCounters, UserProfile};
use super::rule_based::{compute_compatibility, CompatibilityResult, ScoreBreakdown};

/// Row name carrying the intercept in the persisted weight table.
pub const BIAS_ROW: &str = "bias";
/// Contributions at or below this never become reason text.
const REASON_THRESHOLD: f64 = 0.05;
const MAX_REASONS: usize = 5;

/// Trained logistic-regression parameters keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub bias: f64,
    pub weights: BTreeMap<String, f64>,
}

/// One row of the persisted `model_weights` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRow {
    pub feature_name: String,
    pub weight_value: f64,
}

impl ModelWeights {
    /// Weight for a feature; absent entries read as zero.
    pub fn weight(&self, name: FeatureName) -> f64 {
        self.weights.get(name.as_str()).copied().unwrap_or(0.0)
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = WeightRow>,
    {
        let mut model = ModelWeights::default();
        for row in rows {
            if row.feature_name == BIAS_ROW {
                model.bias = row.weight_value;
            } else {
                model.weights.insert(row.feature_name, row.weight_value);
            }
        }
        model
    }

    /// Bias row first, then one row per stored weight.
    pub fn to_rows(&self) -> Vec<WeightRow> {
        let mut rows = Vec::with_capacity(self.weights.len() + 1);
        rows.push(WeightRow {
            feature_name: BIAS_ROW.to_string(),
            weight_value: self.bias,
        });
        rows.extend(self.weights.iter().map(|(name, value)| WeightRow {
            feature_name: name.clone(),
            weight_value: *value,
        }));
        rows
    }
}

/// Per-feature share of a logistic prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureContribution {
    pub feature: FeatureName,
    pub label: String,
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
    pub percentage: u8,
}

/// Output of the logistic scorer, or a wrapped rule-based result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlCompatibilityResult {
    pub score: u8,
    pub probability: f64,
    #[serde(rename = "isML")]
    pub is_ml: bool,
    pub reasons: Vec<String>,
    pub contributions: Vec<FeatureContribution>,
    pub breakdown: ScoreBreakdown,
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Linear term `bias + Σ weight·value` over every known feature.
pub fn linear_score(features: &FeatureVector, weights: &ModelWeights) -> f64 {
    features
        .iter()
        .fold(weights.bias, |acc, (name, value)| {
            acc + weights.weight(name) * value
        })
}

pub fn predict(features: &FeatureVector, weights: &ModelWeights) -> MlCompatibilityResult {
    let z = linear_score(features, weights);
    let probability = sigmoid(z);
    let score = (probability * 100.0).round() as u8;

    let mut contributions: Vec<FeatureContribution> = features
        .iter()
        .map(|(name, value)| {
            let weight = weights.weight(name);
            FeatureContribution {
                feature: name,
                label: name.label().to_string(),
                value,
                weight,
                contribution: weight * value,
                percentage: 0,
            }
        })
        .collect();

    assign_percentages(&mut contributions);

    contributions.sort_by(|left, right| {
        right
            .contribution
            .abs()
            .partial_cmp(&left.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let reasons = contributions
        .iter()
        .take(MAX_REASONS)
        .filter(|entry| entry.contribution > REASON_THRESHOLD)
        .map(|entry| entry.label.clone())
        .collect();

    debug!(z, probability, score, "logistic compatibility scored");

    MlCompatibilityResult {
        score,
        probability,
        is_ml: true,
        reasons,
        contributions,
        breakdown: breakdown_from_features(features),
    }
}

/// Wrap a rule-based result in the ML result shape.
pub fn rule_based_fallback(result: CompatibilityResult) -> MlCompatibilityResult {
    let mut reasons = result.reasons;
    reasons.truncate(MAX_REASONS);

    MlCompatibilityResult {
        score: result.score,
        probability: f64::from(result.score) / 100.0,
        is_ml: false,
        reasons,
        contributions: Vec::new(),
        breakdown: result.breakdown,
    }
}

/// Score a pair with the logistic model when weights are available, else the rules.
pub fn score_pair(
    a: &UserProfile,
    b: &UserProfile,
    historical: Option<&HistoricalCounters>,
    weights: Option<&ModelWeights>,
) -> MlCompatibilityResult {
    match weights {
        Some(weights) => predict(&build_feature_vector(a, b, historical), weights),
        None => {
            debug!(left = %a.id, right = %b.id, "no trained weights, using rule-based scorer");
            rule_based_fallback(compute_compatibility(a, b))
        }
    }
}

/// Each contribution's rounded share of the total absolute contribution.
fn assign_percentages(contributions: &mut [FeatureContribution]) {
    let total: f64 = contributions
        .iter()
        .map(|entry| entry.contribution.abs())
        .sum();
    if !(total > 0.0 && total.is_finite()) {
        return;
    }

    for entry in contributions.iter_mut() {
        entry.percentage = (entry.contribution.abs() / total * 100.0).round() as u8;
    }
}

fn breakdown_from_features(features: &FeatureVector) -> ScoreBreakdown {
    ScoreBreakdown::from_fractions(
        features.interest_jaccard,
        features.same_college,
        features.same_major.max(features.major_similarity),
        features.shared_clubs_norm,
        features.year_proximity,
        features.personality_similarity,
    )
}
