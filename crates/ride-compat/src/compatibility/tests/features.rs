use super::common::*;
use crate::compatibility::profile::{HistoricalCounters, PersonalityProfile, UserProfile};
use crate::compatibility::{build_feature_vector, FeatureName};

#[test]
fn cold_start_pair_reads_neutral() {
    let a = rider("a", "Revelle", "Biology", "1st");
    let b = rider("b", "Warren", "Economics", "3rd");

    let features = build_feature_vector(&a, &b, None);

    assert_eq!(features.same_college, 0.0);
    assert_eq!(features.same_major, 0.0);
    assert_eq!(features.major_similarity, 0.0);
    assert_eq!(features.year_proximity, 0.5);
    assert_eq!(features.interest_jaccard, 0.0);
    assert_eq!(features.shared_clubs_norm, 0.0);
    assert_eq!(features.personality_similarity, 0.5);
    assert_eq!(features.past_shared_rides, 0.0);
    assert_eq!(features.historical_rating, 0.0);
    assert_eq!(features.shared_connections, 0.0);
}

#[test]
fn identical_profiles_max_out_profile_features() {
    let a = complete_rider("a");
    let b = complete_rider("b");

    let features = build_feature_vector(&a, &b, None);

    assert_eq!(features.same_college, 1.0);
    assert_eq!(features.same_major, 1.0);
    assert_eq!(features.major_similarity, 0.0);
    assert_eq!(features.year_proximity, 1.0);
    assert_eq!(features.interest_jaccard, 1.0);
    assert_eq!(features.shared_clubs_norm, 1.0);
    assert_eq!(features.personality_similarity, 1.0);
}

#[test]
fn brief_pair_encodes_expected_values() {
    let (a, b) = brief_pair();

    let features = build_feature_vector(&a, &b, None);

    assert_eq!(features.same_college, 0.0);
    assert_eq!(features.same_major, 1.0);
    assert_eq!(features.year_proximity, 0.5);
    assert!((features.interest_jaccard - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(features.shared_clubs_norm, 0.0);
}

#[test]
fn related_majors_score_half_without_same_major() {
    let a = rider("a", "Muir", "Cognitive Science", "2nd");
    let b = rider("b", "Muir", "cognitive Neuroscience", "2nd");

    let features = build_feature_vector(&a, &b, None);

    assert_eq!(features.same_major, 0.0);
    assert_eq!(features.major_similarity, 0.5);
}

#[test]
fn short_department_tokens_are_not_related() {
    let a = rider("a", "Muir", "EE Circuits", "2nd");
    let b = rider("b", "Muir", "EE Power", "2nd");

    assert_eq!(build_feature_vector(&a, &b, None).major_similarity, 0.0);
}

#[test]
fn personality_mismatch_uses_model_penalty() {
    let a = UserProfile {
        personality: full_personality(),
        ..blank("a")
    };
    let b = UserProfile {
        personality: PersonalityProfile {
            talk: Some("quiet".to_string()),
            music: Some("silence".to_string()),
            schedule: Some("late".to_string()),
            social: Some("introvert".to_string()),
            clean_car_pref: Some("relaxed".to_string()),
        },
        ..blank("b")
    };

    let features = build_feature_vector(&a, &b, None);

    assert!((features.personality_similarity - 0.2).abs() < 1e-12);
}

#[test]
fn partially_answered_personality_mixes_match_and_unset() {
    let a = UserProfile {
        personality: full_personality(),
        ..blank("a")
    };
    let b = UserProfile {
        personality: PersonalityProfile {
            talk: Some("chatty".to_string()),
            music: Some("silence".to_string()),
            ..PersonalityProfile::default()
        },
        ..blank("b")
    };

    let features = build_feature_vector(&a, &b, None);

    // 1.0 + 0.2 + 3 * 0.5
    assert!((features.personality_similarity - 2.7 / 5.0).abs() < 1e-12);
}

#[test]
fn history_counters_are_normalized_and_capped() {
    let a = blank("a");
    let b = blank("b");
    let history = HistoricalCounters {
        past_shared_rides: 7,
        avg_rating: Some(4.0),
        shared_connections: 3,
    };

    let features = build_feature_vector(&a, &b, Some(&history));

    assert_eq!(features.past_shared_rides, 1.0);
    assert!((features.historical_rating - 0.8).abs() < 1e-12);
    assert!((features.shared_connections - 0.3).abs() < 1e-12);
}

#[test]
fn out_of_range_rating_is_clamped() {
    let history = HistoricalCounters {
        avg_rating: Some(6.5),
        ..HistoricalCounters::default()
    };

    let features = build_feature_vector(&blank("a"), &blank("b"), Some(&history));

    assert_eq!(features.historical_rating, 1.0);
}

#[test]
fn feature_iteration_follows_model_order() {
    let (a, b) = brief_pair();
    let features = build_feature_vector(&a, &b, None);

    let names: Vec<FeatureName> = features.iter().map(|(name, _)| name).collect();

    assert_eq!(names, FeatureName::ALL.to_vec());
    assert_eq!(features.get(FeatureName::SameMajor), 1.0);
}
