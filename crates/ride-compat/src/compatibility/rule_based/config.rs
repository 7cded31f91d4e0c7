use serde::{Deserialize, Serialize};

/// Hand-tuned weights for the six rule sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleWeights {
    pub interests: f64,
    pub college: f64,
    pub major: f64,
    pub clubs: f64,
    pub year: f64,
    pub personality: f64,
}

impl RuleWeights {
    pub fn sum(&self) -> f64 {
        self.interests + self.college + self.major + self.clubs + self.year + self.personality
    }
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            interests: 0.30,
            college: 0.20,
            major: 0.15,
            clubs: 0.15,
            year: 0.10,
            personality: 0.10,
        }
    }
}
