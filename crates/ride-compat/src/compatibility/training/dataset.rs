use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::super::features::FeatureVector;
use super::labeling::{label_ride_pair, RideOutcome};
use super::TrainingSample;

/// Failure while importing a labeled ride dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read ride dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ride dataset row: {0}")]
    Csv(#[from] csv::Error),
}

pub fn load_samples_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<TrainingSample>, DatasetError> {
    let file = std::fs::File::open(path)?;
    load_samples(file)
}

/// Parse a CSV export of feature rows and outcome signals into labeled samples.
pub fn load_samples<R: Read>(reader: R) -> Result<Vec<TrainingSample>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut samples = Vec::new();

    for record in csv_reader.deserialize::<DatasetRow>() {
        let row = record?;
        let outcome = row.outcome();
        samples.push(TrainingSample {
            features: row.features(),
            label: label_ride_pair(&outcome),
        });
    }

    Ok(samples)
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
    same_college: f64,
    same_major: f64,
    major_similarity: f64,
    year_proximity: f64,
    interest_jaccard: f64,
    shared_clubs_norm: f64,
    personality_similarity: f64,
    #[serde(default)]
    past_shared_rides: f64,
    #[serde(default)]
    historical_rating: f64,
    #[serde(default)]
    shared_connections: f64,
    #[serde(deserialize_with = "flag")]
    request_accepted: bool,
    #[serde(default)]
    avg_rating: Option<f64>,
    #[serde(default)]
    reports_filed: u32,
    #[serde(default)]
    chat_messages: u32,
    #[serde(default, deserialize_with = "flag")]
    ride_repeated: bool,
}

impl DatasetRow {
    fn features(&self) -> FeatureVector {
        FeatureVector {
            same_college: self.same_college,
            same_major: self.same_major,
            major_similarity: self.major_similarity,
            year_proximity: self.year_proximity,
            interest_jaccard: self.interest_jaccard,
            shared_clubs_norm: self.shared_clubs_norm,
            personality_similarity: self.personality_similarity,
            past_shared_rides: self.past_shared_rides,
            historical_rating: self.historical_rating,
            shared_connections: self.shared_connections,
        }
    }

    fn outcome(&self) -> RideOutcome {
        RideOutcome {
            request_accepted: self.request_accepted,
            avg_rating: self.avg_rating,
            reports_filed: self.reports_filed,
            chat_messages: self.chat_messages,
            ride_repeated: self.ride_repeated,
        }
    }
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Ok(true),
        "false" | "f" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected a boolean flag, found '{other}'"
        ))),
    }
}
