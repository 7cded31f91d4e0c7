use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Rider snapshot consumed by both scoring paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub id: String,
    pub interests: BTreeSet<String>,
    pub clubs: BTreeSet<String>,
    pub college: String,
    pub major: String,
    pub year: String,
    pub music_tag: Option<String>,
    pub personality: PersonalityProfile,
}

/// The rule-based scorer reads the same record as the feature builder.
pub type CompatibilityProfile = UserProfile;

/// Ride-style preferences; `None` means the rider never answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalityProfile {
    pub talk: Option<String>,
    pub music: Option<String>,
    pub schedule: Option<String>,
    pub social: Option<String>,
    pub clean_car_pref: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityDimension {
    Talk,
    Music,
    Schedule,
    Social,
    CleanCar,
}

impl PersonalityDimension {
    pub const ALL: [PersonalityDimension; 5] = [
        PersonalityDimension::Talk,
        PersonalityDimension::Music,
        PersonalityDimension::Schedule,
        PersonalityDimension::Social,
        PersonalityDimension::CleanCar,
    ];

    /// Reason text shown when both riders picked the same answer.
    pub fn match_reason(self) -> &'static str {
        match self {
            PersonalityDimension::Talk => "Same chattiness level",
            PersonalityDimension::Music => "Same in-car music preference",
            PersonalityDimension::Schedule => "Compatible schedules",
            PersonalityDimension::Social => "Similar social energy",
            PersonalityDimension::CleanCar => "Same clean-car standards",
        }
    }
}

impl PersonalityProfile {
    /// Answer for a dimension, treating blank strings as unanswered.
    pub fn setting(&self, dimension: PersonalityDimension) -> Option<&str> {
        let value = match dimension {
            PersonalityDimension::Talk => &self.talk,
            PersonalityDimension::Music => &self.music,
            PersonalityDimension::Schedule => &self.schedule,
            PersonalityDimension::Social => &self.social,
            PersonalityDimension::CleanCar => &self.clean_car_pref,
        };
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Numeric class standing: `1st`..`5th+` map to 1..5, `Grad` to 5, anything else to 3.
    pub fn year_rank(&self) -> u8 {
        year_rank(&self.year)
    }

    pub fn music_tag(&self) -> Option<&str> {
        self.music_tag
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

pub fn year_rank(year: &str) -> u8 {
    let trimmed = year.trim();
    if trimmed
        .get(..4)
        .map(|prefix| prefix.eq_ignore_ascii_case("grad"))
        .unwrap_or(false)
    {
        return 5;
    }

    match trimmed.chars().next() {
        Some(digit @ '1'..='5') => digit as u8 - b'0',
        _ => 3,
    }
}

/// Trimmed, non-empty view of a tag set.
pub(crate) fn tag_set(tags: &BTreeSet<String>) -> BTreeSet<&str> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Ride-history counters for a pair, sourced from the trip store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoricalCounters {
    pub past_shared_rides: u32,
    pub avg_rating: Option<f64>,
    pub shared_connections: u32,
}

/// Flat user row as persisted by the app's data store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredUserRecord {
    pub id: String,
    pub interests: Vec<String>,
    pub clubs: Vec<String>,
    pub college: Option<String>,
    pub major: Option<String>,
    pub year: Option<String>,
    pub music_tag: Option<String>,
    pub personality_talk: Option<String>,
    pub personality_music: Option<String>,
    pub personality_schedule: Option<String>,
    pub personality_social: Option<String>,
    pub personality_clean_car: Option<String>,
}

impl From<StoredUserRecord> for UserProfile {
    fn from(record: StoredUserRecord) -> Self {
        UserProfile {
            id: record.id,
            interests: collect_tags(record.interests),
            clubs: collect_tags(record.clubs),
            college: record.college.unwrap_or_default().trim().to_string(),
            major: record.major.unwrap_or_default().trim().to_string(),
            year: record.year.unwrap_or_default().trim().to_string(),
            music_tag: non_blank(record.music_tag),
            personality: PersonalityProfile {
                talk: non_blank(record.personality_talk),
                music: non_blank(record.personality_music),
                schedule: non_blank(record.personality_schedule),
                social: non_blank(record.personality_social),
                clean_car_pref: non_blank(record.personality_clean_car),
            },
        }
    }
}

fn collect_tags(tags: Vec<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
