use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::logistic::{score_pair, MlCompatibilityResult, ModelWeights, WeightRow};
use super::profile::{HistoricalCounters, UserProfile};

/// Default freshness window for cached model weights.
pub const DEFAULT_WEIGHTS_TTL_SECS: i64 = 300;

/// Time source, injectable so expiry can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Storage adapter yielding the currently published weights, if any.
pub trait WeightSource: Send + Sync {
    fn load(&self) -> Result<Option<ModelWeights>, WeightSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum WeightSourceError {
    #[error("failed to read weight table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid weight table {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("weight store unavailable: {0}")]
    Unavailable(String),
}

/// Reads a published weight table from JSON: either a list of rows or a `ModelWeights` object.
#[derive(Debug, Clone)]
pub struct JsonFileWeightSource {
    path: PathBuf,
}

impl JsonFileWeightSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeightDocument {
    Rows(Vec<WeightRow>),
    Model(ModelWeights),
}

impl WeightSource for JsonFileWeightSource {
    fn load(&self) -> Result<Option<ModelWeights>, WeightSourceError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(WeightSourceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: WeightDocument =
            serde_json::from_str(&raw).map_err(|source| WeightSourceError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let model = match document {
            WeightDocument::Rows(rows) if rows.is_empty() => return Ok(None),
            WeightDocument::Rows(rows) => ModelWeights::from_rows(rows),
            WeightDocument::Model(model) => model,
        };
        Ok(Some(model))
    }
}

/// Load once from the source; a failure is logged and reads as "no model".
pub fn load_or_fallback<S>(source: &S) -> Option<ModelWeights>
where
    S: WeightSource + ?Sized,
{
    match source.load() {
        Ok(value) => {
            debug!(trained = value.is_some(), "model weights refreshed");
            value
        }
        Err(err) => {
            warn!(error = %err, "model weights unavailable, falling back to rules");
            None
        }
    }
}

#[derive(Debug, Clone)]
struct CachedWeights {
    value: Option<ModelWeights>,
    fetched_at: DateTime<Utc>,
}

/// TTL cache in front of a weight source. Owned by the caller; wrap in a `Mutex` to share.
pub struct WeightCache<C: Clock = SystemClock> {
    ttl: Duration,
    clock: C,
    entry: Option<CachedWeights>,
}

impl WeightCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<C: Clock> WeightCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entry: None,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached weights while fresh, otherwise a reload. Load failures read as "no model".
    pub fn current<S>(&mut self, source: &S) -> Option<&ModelWeights>
    where
        S: WeightSource + ?Sized,
    {
        let now = self.clock.now();
        let stale = self
            .entry
            .as_ref()
            .map(|entry| now - entry.fetched_at >= self.ttl)
            .unwrap_or(true);

        if stale {
            let value = load_or_fallback(source);
            self.entry = Some(CachedWeights {
                value,
                fetched_at: now,
            });
        }

        self.entry.as_ref().and_then(|entry| entry.value.as_ref())
    }

    /// Score a pair against the current weights, reloading them first when stale.
    pub fn score<S>(
        &mut self,
        source: &S,
        a: &UserProfile,
        b: &UserProfile,
        historical: Option<&HistoricalCounters>,
    ) -> MlCompatibilityResult
    where
        S: WeightSource + ?Sized,
    {
        let weights = self.current(source);
        score_pair(a, b, historical, weights)
    }

    /// Cached weights without touching the source, ignoring freshness.
    pub fn peek(&self) -> Option<&ModelWeights> {
        self.entry.as_ref().and_then(|entry| entry.value.as_ref())
    }

    pub fn is_fresh(&self) -> bool {
        self.entry
            .as_ref()
            .map(|entry| self.clock.now() - entry.fetched_at < self.ttl)
            .unwrap_or(false)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        fn advance(&self, by: Duration) {
            let mut guard = self.now.lock().expect("clock mutex poisoned");
            *guard = *guard + by;
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().expect("clock mutex poisoned")
        }
    }

    #[derive(Default)]
    struct CountingSource {
        loads: AtomicUsize,
        fail: bool,
    }

    impl WeightSource for CountingSource {
        fn load(&self) -> Result<Option<ModelWeights>, WeightSourceError> {
            let load = self.loads.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(WeightSourceError::Unavailable("connection refused".to_string()));
            }
            Ok(Some(ModelWeights {
                bias: load as f64,
                ..ModelWeights::default()
            }))
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-09-24T10:00:00Z")
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn serves_cached_weights_until_ttl_expires() {
        let clock = ManualClock::starting_at(start());
        let source = CountingSource::default();
        let mut cache = WeightCache::with_clock(Duration::seconds(300), &clock);

        assert_eq!(cache.current(&source).map(|model| model.bias), Some(1.0));
        clock.advance(Duration::seconds(299));
        assert_eq!(cache.current(&source).map(|model| model.bias), Some(1.0));
        assert!(cache.is_fresh());

        clock.advance(Duration::seconds(1));
        assert!(!cache.is_fresh());
        assert_eq!(cache.current(&source).map(|model| model.bias), Some(2.0));
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let clock = ManualClock::starting_at(start());
        let source = CountingSource::default();
        let mut cache = WeightCache::with_clock(Duration::seconds(300), &clock);

        cache.current(&source);
        cache.invalidate();
        assert!(cache.peek().is_none());
        assert_eq!(cache.current(&source).map(|model| model.bias), Some(2.0));
    }

    #[test]
    fn load_failures_degrade_to_no_model_and_are_cached() {
        let clock = ManualClock::starting_at(start());
        let source = CountingSource {
            fail: true,
            ..CountingSource::default()
        };
        let mut cache = WeightCache::with_clock(Duration::seconds(60), &clock);

        assert!(cache.current(&source).is_none());
        assert!(cache.current(&source).is_none());
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scoring_many_pairs_reuses_one_load_until_expiry() {
        let clock = ManualClock::starting_at(start());
        let source = CountingSource::default();
        let mut cache = WeightCache::with_clock(Duration::seconds(300), &clock);
        let riders = ["maya", "jordan", "priya", "leo"].map(UserProfile::new);

        for pair in riders.windows(2) {
            let result = cache.score(&source, &pair[0], &pair[1], None);
            assert!(result.is_ml);
        }
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(300));
        cache.score(&source, &riders[0], &riders[3], None);
        assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cached_scoring_falls_back_to_rules_when_the_store_fails() {
        let clock = ManualClock::starting_at(start());
        let source = CountingSource {
            fail: true,
            ..CountingSource::default()
        };
        let mut cache = WeightCache::with_clock(Duration::seconds(60), &clock);
        let (a, b) = (UserProfile::new("maya"), UserProfile::new("jordan"));

        let first = cache.score(&source, &a, &b, None);
        let second = cache.score(&source, &b, &a, None);

        assert!(!first.is_ml);
        assert_eq!(first.score, second.score);
        assert_eq!(source.loads.load(Ordering::SeqCst), 1);
        assert!(load_or_fallback(&source).is_none());
    }

    #[test]
    fn missing_weight_file_means_no_model() {
        let source = JsonFileWeightSource::new("/nonexistent/model_weights.json");
        assert!(source.load().expect("missing file is not an error").is_none());
    }
}
