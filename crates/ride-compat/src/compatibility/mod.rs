//! Rider compatibility scoring.
//!
//! Two interchangeable scorers sit behind one entry point. The rule-based scorer reads
//! profiles directly and always works; the logistic scorer consumes a feature vector and
//! trained weights. `score_pair` dispatches between them, so callers never have to treat a
//! missing model as an error.

pub mod cache;
pub mod features;
pub mod logistic;
pub mod profile;
pub mod rule_based;
pub mod training;

#[cfg(test)]
mod tests;

pub use cache::{
    load_or_fallback, Clock, JsonFileWeightSource, SystemClock, WeightCache, WeightSource,
    WeightSourceError,
};
pub use features::{build_feature_vector, FeatureName, FeatureVector, FEATURE_NAMES};
pub use logistic::{
    predict, rule_based_fallback, score_pair, FeatureContribution, MlCompatibilityResult,
    ModelWeights, WeightRow,
};
pub use profile::{
    CompatibilityProfile, HistoricalCounters, PersonalityDimension, PersonalityProfile,
    StoredUserRecord, UserProfile,
};
pub use rule_based::{
    compute_compatibility, CompatibilityResult, RuleBasedScorer, RuleWeights, ScoreBreakdown,
};
pub use training::{
    evaluate_model, label_ride_pair, load_samples, train_logistic_regression, ModelEvaluation,
    PairLabel, RideOutcome, TrainingError, TrainingOptions, TrainingSample,
};
