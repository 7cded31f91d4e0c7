use clap::Args;
use ride_compat::compatibility::training::{load_samples_from_path, outcome_points};
use ride_compat::compatibility::{
    evaluate_model, label_ride_pair, load_or_fallback, score_pair, train_logistic_regression,
    HistoricalCounters, JsonFileWeightSource, ModelWeights, RideOutcome, StoredUserRecord,
    UserProfile, WeightCache, WeightSource,
};
use ride_compat::config::AppConfig;
use ride_compat::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// First rider profile (JSON)
    #[arg(long)]
    pub(crate) a: PathBuf,
    /// Second rider profile (JSON)
    #[arg(long)]
    pub(crate) b: PathBuf,
    /// Treat profile files as flat persisted user rows instead of profile documents
    #[arg(long)]
    pub(crate) stored: bool,
    /// Optional ride-history counters for the pair (JSON)
    #[arg(long)]
    pub(crate) history: Option<PathBuf>,
    /// Published weight table; overrides COMPAT_WEIGHTS_PATH and must parse
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// JSON array of `{ "a": profile, "b": profile, "history": counters? }` entries
    #[arg(long)]
    pub(crate) pairs: PathBuf,
    /// Published weight table; overrides COMPAT_WEIGHTS_PATH
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct PairRequest {
    a: UserProfile,
    b: UserProfile,
    #[serde(default)]
    history: Option<HistoricalCounters>,
}

#[derive(Args, Debug)]
pub(crate) struct TrainArgs {
    /// CSV export of feature rows with ride outcome columns
    #[arg(long)]
    pub(crate) dataset: PathBuf,
    /// Destination for the weight table (JSON rows)
    #[arg(long)]
    pub(crate) out: PathBuf,
    /// Override COMPAT_LEARNING_RATE
    #[arg(long)]
    pub(crate) learning_rate: Option<f64>,
    /// Override COMPAT_EPOCHS
    #[arg(long)]
    pub(crate) epochs: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct LabelArgs {
    /// The ride request was accepted
    #[arg(long)]
    pub(crate) accepted: bool,
    /// Average rating the riders gave each other (0-5)
    #[arg(long)]
    pub(crate) rating: Option<f64>,
    /// Number of reports filed about the ride
    #[arg(long, default_value_t = 0)]
    pub(crate) reports: u32,
    /// Chat messages exchanged
    #[arg(long, default_value_t = 0)]
    pub(crate) messages: u32,
    /// The pair rode together again
    #[arg(long)]
    pub(crate) repeated: bool,
}

pub(crate) fn run_score(args: ScoreArgs, config: &AppConfig) -> Result<(), AppError> {
    let a = read_profile(&args.a, args.stored)?;
    let b = read_profile(&args.b, args.stored)?;
    let history: Option<HistoricalCounters> =
        args.history.as_deref().map(read_json).transpose()?;

    // An explicitly named table must load; the configured one degrades to the rules.
    let weights = match (args.weights, config.scoring.weights_path.as_ref()) {
        (Some(path), _) => JsonFileWeightSource::new(path).load()?,
        (None, Some(path)) => load_or_fallback(&JsonFileWeightSource::new(path.clone())),
        (None, None) => None,
    };

    let result = score_pair(&a, &b, history.as_ref(), weights.as_ref());
    info!(left = %a.id, right = %b.id, score = result.score, ml = result.is_ml, "pair scored");

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Score a list of pairs, reloading the weight table only once it goes stale.
pub(crate) fn run_batch(args: BatchArgs, config: &AppConfig) -> Result<(), AppError> {
    let requests: Vec<PairRequest> = read_json(&args.pairs)?;
    let mut cache = WeightCache::new(config.scoring.weights_ttl());
    let source = args
        .weights
        .or_else(|| config.scoring.weights_path.clone())
        .map(JsonFileWeightSource::new);

    let results: Vec<_> = requests
        .iter()
        .map(|request| match &source {
            Some(source) => cache.score(source, &request.a, &request.b, request.history.as_ref()),
            None => score_pair(&request.a, &request.b, request.history.as_ref(), None),
        })
        .collect();

    info!(
        pairs = results.len(),
        ml = results.iter().filter(|result| result.is_ml).count(),
        "batch scored"
    );
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

pub(crate) fn run_train(args: TrainArgs, config: &AppConfig) -> Result<(), AppError> {
    let mut options = config.training.options();
    if let Some(rate) = args.learning_rate {
        options.learning_rate = rate;
    }
    if let Some(epochs) = args.epochs {
        options.epochs = epochs;
    }

    let samples = load_samples_from_path(&args.dataset)?;
    let model = train_logistic_regression(&samples, options)?;
    let evaluation = evaluate_model(&model, &samples);

    write_weights(&args.out, &model)?;

    println!("Compatibility model training");
    println!("  Dataset: {}", args.dataset.display());
    println!(
        "  Samples: {} | Learning rate: {} | Epochs: {}",
        evaluation.sample_count, options.learning_rate, options.epochs
    );
    println!(
        "  Mean squared error: {:.4} | Accuracy: {:.1}%",
        evaluation.mean_squared_error,
        evaluation.accuracy * 100.0
    );
    println!("  Weights written to {}", args.out.display());

    Ok(())
}

pub(crate) fn run_label(args: LabelArgs) -> Result<(), AppError> {
    let outcome = RideOutcome {
        request_accepted: args.accepted,
        avg_rating: args.rating,
        reports_filed: args.reports,
        chat_messages: args.messages,
        ride_repeated: args.repeated,
    };

    let label = label_ride_pair(&outcome);
    if outcome.request_accepted {
        println!(
            "label {} ({:?}, {} points)",
            label.value(),
            label,
            outcome_points(&outcome)
        );
    } else {
        println!("label {} ({:?}, request not accepted)", label.value(), label);
    }
    Ok(())
}

pub(crate) fn write_weights(path: &Path, model: &ModelWeights) -> Result<(), AppError> {
    let rows = serde_json::to_string_pretty(&model.to_rows())?;
    std::fs::write(path, rows)?;
    info!(path = %path.display(), "model weights published");
    Ok(())
}

fn read_profile(path: &Path, stored: bool) -> Result<UserProfile, AppError> {
    if stored {
        read_json::<StoredUserRecord>(path).map(UserProfile::from)
    } else {
        read_json(path)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
