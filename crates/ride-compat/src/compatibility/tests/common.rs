use std::collections::BTreeSet;

use crate::compatibility::profile::{PersonalityProfile, UserProfile};
use crate::compatibility::training::{PairLabel, TrainingSample};
use crate::compatibility::{FeatureVector, ModelWeights, WeightRow};

pub(super) fn tags(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub(super) fn blank(id: &str) -> UserProfile {
    UserProfile::new(id)
}

pub(super) fn rider(id: &str, college: &str, major: &str, year: &str) -> UserProfile {
    UserProfile {
        id: id.to_string(),
        college: college.to_string(),
        major: major.to_string(),
        year: year.to_string(),
        ..UserProfile::default()
    }
}

pub(super) fn full_personality() -> PersonalityProfile {
    PersonalityProfile {
        talk: Some("chatty".to_string()),
        music: Some("aux-sharing".to_string()),
        schedule: Some("early".to_string()),
        social: Some("extrovert".to_string()),
        clean_car_pref: Some("spotless".to_string()),
    }
}

/// Fully filled-in rider with three clubs, used for "identical profile" cases.
pub(super) fn complete_rider(id: &str) -> UserProfile {
    UserProfile {
        interests: tags(&["surf", "boba", "hiking"]),
        clubs: tags(&["ACM", "Triton Rideshare", "Surf Club"]),
        music_tag: Some("indie".to_string()),
        personality: full_personality(),
        ..rider(id, "Sixth", "Computer Science", "3rd")
    }
}

/// Example pair from the product brief: Sixth/Muir CS sophomore and senior.
pub(super) fn brief_pair() -> (UserProfile, UserProfile) {
    let a = UserProfile {
        interests: tags(&["surf", "boba"]),
        ..rider("maya", "Sixth", "Computer Science", "2nd")
    };
    let b = UserProfile {
        interests: tags(&["boba", "hiking"]),
        ..rider("jordan", "Muir", "Computer Science", "4th")
    };
    (a, b)
}

pub(super) fn weights(bias: f64, entries: &[(&str, f64)]) -> ModelWeights {
    let mut rows = vec![WeightRow {
        feature_name: "bias".to_string(),
        weight_value: bias,
    }];
    rows.extend(entries.iter().map(|(name, value)| WeightRow {
        feature_name: name.to_string(),
        weight_value: *value,
    }));
    ModelWeights::from_rows(rows)
}

pub(super) fn uniform_features(value: f64) -> FeatureVector {
    FeatureVector {
        same_college: value,
        same_major: value,
        major_similarity: 0.0,
        year_proximity: value,
        interest_jaccard: value,
        shared_clubs_norm: value,
        personality_similarity: value,
        past_shared_rides: value,
        historical_rating: value,
        shared_connections: value,
    }
}

/// Balanced, linearly separable samples: matched pairs look alike, rejected ones do not.
pub(super) fn separable_samples() -> Vec<TrainingSample> {
    let mut samples = Vec::new();
    for step in 0..10 {
        let jitter = f64::from(step) * 0.02;
        samples.push(TrainingSample::new(
            uniform_features(0.8 + jitter),
            PairLabel::Compatible,
        ));
        samples.push(TrainingSample::new(
            uniform_features(0.1 + jitter),
            PairLabel::Incompatible,
        ));
    }
    samples
}
