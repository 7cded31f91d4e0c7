use serde::{Deserialize, Serialize};

/// Minimum points for a pair to count as compatible.
const COMPATIBLE_THRESHOLD: u8 = 2;

/// Interaction signals observed after two riders were matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RideOutcome {
    pub request_accepted: bool,
    pub avg_rating: Option<f64>,
    pub reports_filed: u32,
    pub chat_messages: u32,
    pub ride_repeated: bool,
}

/// Binary training label for a rider pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairLabel {
    Incompatible,
    Compatible,
}

impl PairLabel {
    pub fn value(self) -> u8 {
        match self {
            PairLabel::Incompatible => 0,
            PairLabel::Compatible => 1,
        }
    }

    pub fn target(self) -> f64 {
        f64::from(self.value())
    }
}

/// Points earned by an accepted ride.
pub fn outcome_points(outcome: &RideOutcome) -> u8 {
    let mut points = 0;
    if outcome.avg_rating.map(|rating| rating >= 4.0).unwrap_or(false) {
        points += 2;
    }
    if outcome.reports_filed == 0 {
        points += 1;
    }
    if outcome.chat_messages > 3 {
        points += 1;
    }
    if outcome.ride_repeated {
        points += 2;
    }
    points
}

pub fn label_ride_pair(outcome: &RideOutcome) -> PairLabel {
    if !outcome.request_accepted {
        return PairLabel::Incompatible;
    }

    if outcome_points(outcome) >= COMPATIBLE_THRESHOLD {
        PairLabel::Compatible
    } else {
        PairLabel::Incompatible
    }
}
