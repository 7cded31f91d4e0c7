use std::fmt;

use serde::{Deserialize, Serialize};

use super::profile::{tag_set, HistoricalCounters, PersonalityDimension, UserProfile};

/// Score for a personality dimension answered differently by both riders.
const PERSONALITY_MISMATCH: f64 = 0.2;
const PERSONALITY_UNSET: f64 = 0.5;
const RELATED_MAJOR: f64 = 0.5;

pub const FEATURE_COUNT: usize = 10;

/// Feature names in model order. Persisted weight rows use these keys.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "same_college",
    "same_major",
    "major_similarity",
    "year_proximity",
    "interest_jaccard",
    "shared_clubs_norm",
    "personality_similarity",
    "past_shared_rides",
    "historical_rating",
    "shared_connections",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureName {
    SameCollege,
    SameMajor,
    MajorSimilarity,
    YearProximity,
    InterestJaccard,
    SharedClubsNorm,
    PersonalitySimilarity,
    PastSharedRides,
    HistoricalRating,
    SharedConnections,
}

impl FeatureName {
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        FeatureName::SameCollege,
        FeatureName::SameMajor,
        FeatureName::MajorSimilarity,
        FeatureName::YearProximity,
        FeatureName::InterestJaccard,
        FeatureName::SharedClubsNorm,
        FeatureName::PersonalitySimilarity,
        FeatureName::PastSharedRides,
        FeatureName::HistoricalRating,
        FeatureName::SharedConnections,
    ];

    pub fn as_str(self) -> &'static str {
        FEATURE_NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| Self::ALL[index])
    }

    /// Human-readable label used for explanations.
    pub fn label(self) -> &'static str {
        match self {
            FeatureName::SameCollege => "Same college",
            FeatureName::SameMajor => "Same major",
            FeatureName::MajorSimilarity => "Related majors",
            FeatureName::YearProximity => "Close in class year",
            FeatureName::InterestJaccard => "Shared interests",
            FeatureName::SharedClubsNorm => "Shared clubs",
            FeatureName::PersonalitySimilarity => "Compatible ride style",
            FeatureName::PastSharedRides => "Ridden together before",
            FeatureName::HistoricalRating => "Rated each other highly",
            FeatureName::SharedConnections => "Mutual connections",
        }
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric encoding of a rider pair; every field lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub same_college: f64,
    pub same_major: f64,
    pub major_similarity: f64,
    pub year_proximity: f64,
    pub interest_jaccard: f64,
    pub shared_clubs_norm: f64,
    pub personality_similarity: f64,
    pub past_shared_rides: f64,
    pub historical_rating: f64,
    pub shared_connections: f64,
}

impl FeatureVector {
    pub fn get(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::SameCollege => self.same_college,
            FeatureName::SameMajor => self.same_major,
            FeatureName::MajorSimilarity => self.major_similarity,
            FeatureName::YearProximity => self.year_proximity,
            FeatureName::InterestJaccard => self.interest_jaccard,
            FeatureName::SharedClubsNorm => self.shared_clubs_norm,
            FeatureName::PersonalitySimilarity => self.personality_similarity,
            FeatureName::PastSharedRides => self.past_shared_rides,
            FeatureName::HistoricalRating => self.historical_rating,
            FeatureName::SharedConnections => self.shared_connections,
        }
    }

    pub fn set(&mut self, name: FeatureName, value: f64) {
        let slot = match name {
            FeatureName::SameCollege => &mut self.same_college,
            FeatureName::SameMajor => &mut self.same_major,
            FeatureName::MajorSimilarity => &mut self.major_similarity,
            FeatureName::YearProximity => &mut self.year_proximity,
            FeatureName::InterestJaccard => &mut self.interest_jaccard,
            FeatureName::SharedClubsNorm => &mut self.shared_clubs_norm,
            FeatureName::PersonalitySimilarity => &mut self.personality_similarity,
            FeatureName::PastSharedRides => &mut self.past_shared_rides,
            FeatureName::HistoricalRating => &mut self.historical_rating,
            FeatureName::SharedConnections => &mut self.shared_connections,
        };
        *slot = value;
    }

    /// Values paired with their names, in `FEATURE_NAMES` order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureName, f64)> + '_ {
        FeatureName::ALL.into_iter().map(|name| (name, self.get(name)))
    }
}

/// Encode a rider pair. Total over any input; missing data reads as neutral.
pub fn build_feature_vector(
    a: &UserProfile,
    b: &UserProfile,
    historical: Option<&HistoricalCounters>,
) -> FeatureVector {
    let same_major = same_value(&a.major, &b.major);
    let major_similarity = if !same_major && related_majors(&a.major, &b.major) {
        RELATED_MAJOR
    } else {
        0.0
    };

    let history = historical.copied().unwrap_or_default();

    FeatureVector {
        same_college: indicator(same_value(&a.college, &b.college)),
        same_major: indicator(same_major),
        major_similarity,
        year_proximity: year_proximity(a, b),
        interest_jaccard: interest_jaccard(a, b),
        shared_clubs_norm: (shared_clubs(a, b).len() as f64 / 3.0).min(1.0),
        personality_similarity: personality_similarity(a, b, PERSONALITY_MISMATCH),
        past_shared_rides: (history.past_shared_rides as f64 / 5.0).min(1.0),
        historical_rating: history
            .avg_rating
            .filter(|rating| rating.is_finite())
            .map(|rating| (rating / 5.0).clamp(0.0, 1.0))
            .unwrap_or(0.0),
        shared_connections: (history.shared_connections as f64 / 10.0).min(1.0),
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn interest_jaccard(a: &UserProfile, b: &UserProfile) -> f64 {
    let left = tag_set(&a.interests);
    let right = tag_set(&b.interests);
    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(&right).count() as f64 / union as f64
}

/// Case-insensitive equality where an unknown value never matches.
pub(crate) fn same_value(left: &str, right: &str) -> bool {
    let left = left.trim();
    !left.is_empty() && left.eq_ignore_ascii_case(right.trim())
}

/// Categorical answers (personality settings, music tags) ignore ASCII case.
pub(crate) fn same_answer(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

/// First word of a major, lowercased, when it is long enough to name a department.
pub(crate) fn department_token(major: &str) -> Option<String> {
    major
        .split_whitespace()
        .next()
        .map(str::to_lowercase)
        .filter(|token| token.chars().count() > 2)
}

pub(crate) fn related_majors(left: &str, right: &str) -> bool {
    match (department_token(left), department_token(right)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

pub(crate) fn year_proximity(a: &UserProfile, b: &UserProfile) -> f64 {
    let gap = (a.year_rank() as f64 - b.year_rank() as f64).abs();
    (1.0 - 0.25 * gap).max(0.0)
}

pub(crate) fn shared_clubs<'a>(a: &'a UserProfile, b: &UserProfile) -> Vec<&'a str> {
    let right = tag_set(&b.clubs);
    tag_set(&a.clubs)
        .into_iter()
        .filter(|club| right.contains(club))
        .collect()
}

pub(crate) fn personality_similarity(a: &UserProfile, b: &UserProfile, mismatch: f64) -> f64 {
    let total: f64 = PersonalityDimension::ALL
        .into_iter()
        .map(|dimension| {
            match (
                a.personality.setting(dimension),
                b.personality.setting(dimension),
            ) {
                (Some(left), Some(right)) if same_answer(left, right) => 1.0,
                (Some(_), Some(_)) => mismatch,
                _ => PERSONALITY_UNSET,
            }
        })
        .sum();
    total / PersonalityDimension::ALL.len() as f64
}
