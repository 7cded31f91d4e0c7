use super::super::features::{
    personality_similarity, related_majors, same_answer, same_value, shared_clubs,
    year_proximity,
};
use super::super::profile::{tag_set, CompatibilityProfile, PersonalityDimension};

/// Score for a personality dimension answered differently by both riders.
const PERSONALITY_MISMATCH: f64 = 0.3;
/// At or above this many shared clubs the reason collapses to a count.
const CLUB_SUMMARY_THRESHOLD: usize = 3;
pub(crate) const MAX_REASONS: usize = 6;

/// Raw sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct SubScores {
    pub interests: f64,
    pub college: f64,
    pub major: f64,
    pub clubs: f64,
    pub year: f64,
    pub personality: f64,
}

pub(crate) fn score_profiles(
    a: &CompatibilityProfile,
    b: &CompatibilityProfile,
) -> (SubScores, Vec<String>) {
    let mut reasons = Vec::new();

    let left_interests = tag_set(&a.interests);
    let right_interests = tag_set(&b.interests);
    let shared_interests = left_interests.intersection(&right_interests).count();
    let smaller = left_interests.len().min(right_interests.len()).max(1);
    let interests = (shared_interests as f64 / smaller as f64).min(1.0);
    if shared_interests > 0 {
        reasons.push(format!(
            "{shared_interests} shared interest{}",
            plural(shared_interests)
        ));
    }

    let college = if same_value(&a.college, &b.college) {
        reasons.push(format!("Both at {}", a.college.trim()));
        1.0
    } else {
        0.0
    };

    let major = if same_value(&a.major, &b.major) {
        reasons.push(format!("Both study {}", a.major.trim()));
        1.0
    } else if related_majors(&a.major, &b.major) {
        reasons.push(format!(
            "Related majors: {} and {}",
            a.major.trim(),
            b.major.trim()
        ));
        0.5
    } else {
        0.0
    };

    let clubs_shared = shared_clubs(a, b);
    let clubs = (clubs_shared.len() as f64 / 3.0).min(1.0);
    if clubs_shared.len() >= CLUB_SUMMARY_THRESHOLD {
        reasons.push(format!("{} shared clubs", clubs_shared.len()));
    } else {
        for club in &clubs_shared {
            reasons.push(format!("Both in {club}"));
        }
    }

    let year = year_proximity(a, b);
    if !a.year.trim().is_empty() && !b.year.trim().is_empty() {
        match a.year_rank().abs_diff(b.year_rank()) {
            0 => reasons.push("Same class year".to_string()),
            1 => reasons.push("Adjacent class years".to_string()),
            _ => {}
        }
    }

    let personality = personality_similarity(a, b, PERSONALITY_MISMATCH);
    for dimension in PersonalityDimension::ALL {
        match (
            a.personality.setting(dimension),
            b.personality.setting(dimension),
        ) {
            (Some(left), Some(right)) if same_answer(left, right) => {
                reasons.push(dimension.match_reason().to_string());
            }
            _ => {}
        }
    }

    if let (Some(left), Some(right)) = (a.music_tag(), b.music_tag()) {
        if same_answer(left, right) {
            reasons.push(format!("Both listen to {left}"));
        }
    }

    reasons.truncate(MAX_REASONS);

    let scores = SubScores {
        interests,
        college,
        major,
        clubs,
        year,
        personality,
    };

    (scores, reasons)
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
