use std::env;
use std::fmt;
use std::path::PathBuf;

use chrono::Duration;

use crate::compatibility::cache::DEFAULT_WEIGHTS_TTL_SECS;
use crate::compatibility::TrainingOptions;

/// Distinguishes runtime behavior for different stages of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the scoring engine and its batch jobs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringConfig,
    pub training: TrainingConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let weights_path = env::var("COMPAT_WEIGHTS_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let weights_ttl_secs = env::var("COMPAT_WEIGHTS_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_WEIGHTS_TTL_SECS.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidTtl)?;

        let defaults = TrainingOptions::default();
        let learning_rate = match env::var("COMPAT_LEARNING_RATE") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|rate| rate.is_finite() && *rate > 0.0)
                .ok_or(ConfigError::InvalidLearningRate)?,
            Err(_) => defaults.learning_rate,
        };
        let epochs = match env::var("COMPAT_EPOCHS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidEpochs)?,
            Err(_) => defaults.epochs,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringConfig {
                weights_path,
                weights_ttl_secs,
            },
            training: TrainingConfig {
                learning_rate,
                epochs,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where published model weights live and how long they stay cached.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights_path: Option<PathBuf>,
    pub weights_ttl_secs: u32,
}

impl ScoringConfig {
    pub fn weights_ttl(&self) -> Duration {
        Duration::seconds(i64::from(self.weights_ttl_secs))
    }
}

/// Gradient descent settings for the offline trainer.
#[derive(Debug, Clone, Copy)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub epochs: u32,
}

impl TrainingConfig {
    pub fn options(&self) -> TrainingOptions {
        TrainingOptions {
            learning_rate: self.learning_rate,
            epochs: self.epochs,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTtl,
    InvalidLearningRate,
    InvalidEpochs,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTtl => {
                write!(f, "COMPAT_WEIGHTS_TTL_SECS must be a non-negative integer")
            }
            ConfigError::InvalidLearningRate => {
                write!(f, "COMPAT_LEARNING_RATE must be a positive number")
            }
            ConfigError::InvalidEpochs => write!(f, "COMPAT_EPOCHS must be a valid u32"),
        }
    }
}

impl std::error::Error for ConfigError {}
