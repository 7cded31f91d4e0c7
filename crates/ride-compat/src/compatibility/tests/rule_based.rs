use super::common::*;
use crate::compatibility::profile::{PersonalityProfile, UserProfile};
use crate::compatibility::{
    build_feature_vector, compute_compatibility, RuleBasedScorer, RuleWeights,
};

#[test]
fn brief_pair_scores_forty() {
    let (a, b) = brief_pair();

    let result = compute_compatibility(&a, &b);

    assert_eq!(result.score, 40);
    assert_eq!(
        result.reasons,
        vec![
            "1 shared interest".to_string(),
            "Both study Computer Science".to_string(),
        ]
    );
    assert_eq!(result.breakdown.interests, 50);
    assert_eq!(result.breakdown.college, 0);
    assert_eq!(result.breakdown.major, 100);
    assert_eq!(result.breakdown.clubs, 0);
    assert_eq!(result.breakdown.year, 50);
    assert_eq!(result.breakdown.personality, 50);
}

#[test]
fn identical_complete_profiles_score_one_hundred() {
    let result = compute_compatibility(&complete_rider("a"), &complete_rider("b"));

    assert_eq!(result.score, 100);
    assert_eq!(result.reasons.len(), 6);
    assert_eq!(result.reasons[0], "3 shared interests");
    assert_eq!(result.reasons[1], "Both at Sixth");
    assert_eq!(result.reasons[2], "Both study Computer Science");
    assert_eq!(result.reasons[3], "3 shared clubs");
    assert_eq!(result.reasons[4], "Same class year");
    assert_eq!(result.reasons[5], "Same chattiness level");
}

#[test]
fn cold_start_scores_only_year_and_neutral_personality() {
    let a = rider("a", "Revelle", "Biology", "1st");
    let b = rider("b", "Warren", "Economics", "3rd");

    let result = compute_compatibility(&a, &b);

    // year 0.10 * 0.5 + personality 0.10 * 0.5
    assert_eq!(result.score, 10);
    assert!(result.reasons.is_empty());
    assert_eq!(result.breakdown.personality, 50);
}

#[test]
fn two_shared_clubs_are_listed_by_name() {
    let a = UserProfile {
        clubs: tags(&["ACM", "Surf Club", "Chess"]),
        ..blank("a")
    };
    let b = UserProfile {
        clubs: tags(&["Surf Club", "ACM"]),
        ..blank("b")
    };

    let result = compute_compatibility(&a, &b);

    assert_eq!(
        result.reasons,
        vec!["Both in ACM".to_string(), "Both in Surf Club".to_string()]
    );
    assert_eq!(result.breakdown.clubs, 67);
}

#[test]
fn interest_overlap_divides_by_smaller_set() {
    let a = UserProfile {
        interests: tags(&["boba"]),
        ..blank("a")
    };
    let b = UserProfile {
        interests: tags(&["boba", "surf", "hiking", "climbing"]),
        ..blank("b")
    };

    let result = compute_compatibility(&a, &b);

    assert_eq!(result.breakdown.interests, 100);
    assert_eq!(result.reasons, vec!["1 shared interest".to_string()]);
}

#[test]
fn one_sided_interests_never_produce_a_reason() {
    let a = UserProfile {
        interests: tags(&["boba", "surf"]),
        ..blank("a")
    };

    let result = compute_compatibility(&a, &blank("b"));

    assert_eq!(result.breakdown.interests, 0);
    assert!(result.reasons.is_empty());
}

#[test]
fn related_majors_earn_half_credit_and_a_reason() {
    let a = rider("a", "", "Cognitive Science", "");
    let b = rider("b", "", "Cognitive Neuroscience", "");

    let result = compute_compatibility(&a, &b);

    assert_eq!(result.breakdown.major, 50);
    assert_eq!(
        result.reasons,
        vec!["Related majors: Cognitive Science and Cognitive Neuroscience".to_string()]
    );
}

#[test]
fn personality_mismatch_uses_rule_penalty() {
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

    let result = compute_compatibility(&a, &b);

    assert_eq!(result.breakdown.personality, 30);
}

#[test]
fn adjacent_years_and_music_match_add_reasons() {
    let a = UserProfile {
        music_tag: Some("Indie".to_string()),
        personality: PersonalityProfile {
            schedule: Some("early".to_string()),
            ..PersonalityProfile::default()
        },
        ..rider("a", "", "", "2nd")
    };
    let b = UserProfile {
        music_tag: Some("indie".to_string()),
        personality: PersonalityProfile {
            schedule: Some("early".to_string()),
            ..PersonalityProfile::default()
        },
        ..rider("b", "", "", "3rd")
    };

    let result = compute_compatibility(&a, &b);

    assert_eq!(
        result.reasons,
        vec![
            "Adjacent class years".to_string(),
            "Compatible schedules".to_string(),
            "Both listen to Indie".to_string(),
        ]
    );
}

#[test]
fn categorical_answers_ignore_case_on_both_scoring_paths() {
    let a = UserProfile {
        music_tag: Some("INDIE".to_string()),
        personality: PersonalityProfile {
            talk: Some("Chatty".to_string()),
            ..PersonalityProfile::default()
        },
        ..blank("a")
    };
    let b = UserProfile {
        music_tag: Some("indie".to_string()),
        personality: PersonalityProfile {
            talk: Some(" chatty ".to_string()),
            ..PersonalityProfile::default()
        },
        ..blank("b")
    };

    let result = compute_compatibility(&a, &b);
    let features = build_feature_vector(&a, &b, None);

    assert_eq!(
        result.reasons,
        vec![
            "Same chattiness level".to_string(),
            "Both listen to INDIE".to_string(),
        ]
    );
    assert_eq!(result.breakdown.personality, 60);
    assert!((features.personality_similarity - 0.6).abs() < 1e-12);
}

#[test]
fn custom_weights_change_the_blend() {
    let scorer = RuleBasedScorer::new(RuleWeights {
        interests: 0.0,
        college: 0.0,
        major: 1.0,
        clubs: 0.0,
        year: 0.0,
        personality: 0.0,
    });
    let (a, b) = brief_pair();

    assert_eq!(scorer.score(&a, &b).score, 100);
    assert_eq!(scorer.weights().major, 1.0);
}
