use crate::demo::{run_demo, DemoArgs};
use crate::jobs::{
    run_batch, run_label, run_score, run_train, BatchArgs, LabelArgs, ScoreArgs, TrainArgs,
};
use clap::{Parser, Subcommand};
use ride_compat::config::AppConfig;
use ride_compat::error::AppError;
use ride_compat::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "Ride Compatibility Engine",
    about = "Score rider pairs and retrain the compatibility model from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score two rider profiles and print the result as JSON
    Score(ScoreArgs),
    /// Score a list of pairs against one cached weight table
    Batch(BatchArgs),
    /// Fit logistic weights from a labeled ride dataset (offline batch job)
    Train(TrainArgs),
    /// Label a single ride outcome the way the trainer does
    Label(LabelArgs),
    /// Score sample riders with the rule model and a freshly trained model (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Score(args) => run_score(args, &config),
        Command::Batch(args) => run_batch(args, &config),
        Command::Train(args) => run_train(args, &config),
        Command::Label(args) => run_label(args),
        Command::Demo(args) => run_demo(args, &config),
    }
}
