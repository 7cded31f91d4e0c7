mod config;
mod rules;

pub use config::RuleWeights;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::profile::CompatibilityProfile;
use rules::{score_profiles, SubScores};

/// Stateless scorer applying the hand-tuned rule weights to a rider pair.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScorer {
    weights: RuleWeights,
}

impl RuleBasedScorer {
    pub fn new(weights: RuleWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RuleWeights {
        &self.weights
    }

    pub fn score(&self, a: &CompatibilityProfile, b: &CompatibilityProfile) -> CompatibilityResult {
        let (scores, reasons) = score_profiles(a, b);
        let raw = self.weighted_sum(&scores);
        let score = (raw * 100.0).min(100.0).round().max(0.0) as u8;

        debug!(left = %a.id, right = %b.id, raw, score, "rule-based compatibility scored");

        CompatibilityResult {
            score,
            reasons,
            breakdown: ScoreBreakdown::from_sub_scores(&scores),
        }
    }

    fn weighted_sum(&self, scores: &SubScores) -> f64 {
        let weights = &self.weights;
        weights.interests * scores.interests
            + weights.college * scores.college
            + weights.major * scores.major
            + weights.clubs * scores.clubs
            + weights.year * scores.year
            + weights.personality * scores.personality
    }
}

/// Score a pair with the default rule weights.
pub fn compute_compatibility(
    a: &CompatibilityProfile,
    b: &CompatibilityProfile,
) -> CompatibilityResult {
    RuleBasedScorer::default().score(a, b)
}

/// Rule-based output rendered by the match card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub score: u8,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

/// Percentages (0-100) for the six dimensions shown in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub interests: u8,
    pub college: u8,
    pub major: u8,
    pub clubs: u8,
    pub year: u8,
    pub personality: u8,
}

impl ScoreBreakdown {
    fn from_sub_scores(scores: &SubScores) -> Self {
        Self::from_fractions(
            scores.interests,
            scores.college,
            scores.major,
            scores.clubs,
            scores.year,
            scores.personality,
        )
    }

    pub(crate) fn from_fractions(
        interests: f64,
        college: f64,
        major: f64,
        clubs: f64,
        year: f64,
        personality: f64,
    ) -> Self {
        Self {
            interests: percent(interests),
            college: percent(college),
            major: percent(major),
            clubs: percent(clubs),
            year: percent(year),
            personality: percent(personality),
        }
    }
}

fn percent(fraction: f64) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
