use crate::jobs::write_weights;
use clap::Args;
use ride_compat::compatibility::{
    compute_compatibility, evaluate_model, score_pair, train_logistic_regression,
    HistoricalCounters, MlCompatibilityResult, PersonalityProfile, RideOutcome, TrainingSample,
    UserProfile,
};
use ride_compat::config::AppConfig;
use ride_compat::error::AppError;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the configured learning rate for the demo model.
    #[arg(long)]
    pub(crate) learning_rate: Option<f64>,
    /// Override the configured epoch count for the demo model.
    #[arg(long)]
    pub(crate) epochs: Option<u32>,
    /// Write the demo model's weight table to this path.
    #[arg(long)]
    pub(crate) save_weights: Option<PathBuf>,
    /// Only show the rule-based scores.
    #[arg(long)]
    pub(crate) skip_training: bool,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs {
        learning_rate,
        epochs,
        save_weights,
        skip_training,
    } = args;

    let cohort = sample_cohort();
    let (maya, jordan, priya) = (&cohort[0], &cohort[1], &cohort[2]);

    println!("Ride compatibility demo");
    println!("\nRule-based scoring (no trained model)");
    for (left, right) in [(maya, jordan), (maya, priya), (jordan, priya)] {
        let result = compute_compatibility(left, right);
        println!("- {} + {}: {}/100", left.id, right.id, result.score);
        let breakdown = result.breakdown;
        println!(
            "  interests {} | college {} | major {} | clubs {} | year {} | personality {}",
            breakdown.interests,
            breakdown.college,
            breakdown.major,
            breakdown.clubs,
            breakdown.year,
            breakdown.personality
        );
        for reason in &result.reasons {
            println!("  * {}", reason);
        }
    }

    if skip_training {
        return Ok(());
    }

    let mut options = config.training.options();
    if let Some(rate) = learning_rate {
        options.learning_rate = rate;
    }
    if let Some(epochs) = epochs {
        options.epochs = epochs;
    }

    let samples = synthetic_samples(&cohort);
    let model = train_logistic_regression(&samples, options)?;
    let evaluation = evaluate_model(&model, &samples);
    info!(
        samples = evaluation.sample_count,
        accuracy = evaluation.accuracy,
        "demo model trained"
    );

    println!(
        "\nLogistic model trained on {} synthetic ride outcomes ({} epochs @ {})",
        evaluation.sample_count, options.epochs, options.learning_rate
    );
    println!(
        "- Mean squared error {:.4} | training accuracy {:.0}%",
        evaluation.mean_squared_error,
        evaluation.accuracy * 100.0
    );

    let history = HistoricalCounters {
        past_shared_rides: 2,
        avg_rating: Some(4.6),
        shared_connections: 3,
    };
    let result = score_pair(maya, jordan, Some(&history), Some(&model));
    render_ml_result(maya, jordan, &result);

    if let Some(path) = save_weights {
        write_weights(&path, &model)?;
        println!("\nWeight table written to {}", path.display());
    }

    Ok(())
}

fn render_ml_result(left: &UserProfile, right: &UserProfile, result: &MlCompatibilityResult) {
    println!(
        "\nModel scoring for {} + {}: {}/100 (p = {:.3})",
        left.id, right.id, result.score, result.probability
    );
    println!("Feature contributions:");
    for entry in &result.contributions {
        println!(
            "  - {:<24} value {:.2} x weight {:+.3} = {:+.3} ({}%)",
            entry.label, entry.value, entry.weight, entry.contribution, entry.percentage
        );
    }
    if result.reasons.is_empty() {
        println!("Reasons: none above threshold");
    } else {
        println!("Reasons: {}", result.reasons.join(", "));
    }
}

fn sample_cohort() -> Vec<UserProfile> {
    vec![
        rider(
            "maya",
            ("Sixth", "Computer Science", "2nd"),
            &["surf", "boba", "climbing"],
            &["ACM", "Surf Club"],
            Some("indie"),
            ("chatty", "shared", "morning"),
        ),
        rider(
            "jordan",
            ("Sixth", "Computer Engineering", "3rd"),
            &["boba", "climbing", "hiking"],
            &["ACM", "Hiking Club"],
            Some("indie"),
            ("chatty", "driver", "morning"),
        ),
        rider(
            "priya",
            ("Revelle", "Biology", "4th"),
            &["chess", "piano"],
            &["Pre-Med Society"],
            Some("classical"),
            ("quiet", "none", "evening"),
        ),
        rider(
            "leo",
            ("Muir", "Biology", "Grad"),
            &["chess", "running"],
            &["Pre-Med Society", "Running Club"],
            None,
            ("quiet", "none", "evening"),
        ),
        rider(
            "ana",
            ("Sixth", "Cognitive Science", "2nd"),
            &["surf", "boba"],
            &["Surf Club"],
            Some("indie"),
            ("chatty", "shared", "morning"),
        ),
        rider(
            "sam",
            ("Warren", "Economics", "1st"),
            &["gaming"],
            &[],
            Some("edm"),
            ("quiet", "driver", "late"),
        ),
    ]
}

fn rider(
    id: &str,
    (college, major, year): (&str, &str, &str),
    interests: &[&str],
    clubs: &[&str],
    music_tag: Option<&str>,
    (talk, music, schedule): (&str, &str, &str),
) -> UserProfile {
    UserProfile {
        interests: interests.iter().map(|tag| tag.to_string()).collect(),
        clubs: clubs.iter().map(|club| club.to_string()).collect(),
        college: college.to_string(),
        major: major.to_string(),
        year: year.to_string(),
        music_tag: music_tag.map(str::to_string),
        personality: PersonalityProfile {
            talk: Some(talk.to_string()),
            music: Some(music.to_string()),
            schedule: Some(schedule.to_string()),
            ..PersonalityProfile::default()
        },
        ..UserProfile::new(id)
    }
}

/// Every pair in the cohort with an outcome that tracks its rule score.
fn synthetic_samples(cohort: &[UserProfile]) -> Vec<TrainingSample> {
    let mut samples = Vec::new();
    for (index, left) in cohort.iter().enumerate() {
        for right in &cohort[index + 1..] {
            let score = compute_compatibility(left, right).score;
            let good = score >= 45;
            let history = HistoricalCounters {
                past_shared_rides: if good { 2 } else { 0 },
                avg_rating: Some(if good { 4.5 } else { 2.5 }),
                shared_connections: u32::from(score / 20),
            };
            let outcome = RideOutcome {
                request_accepted: score >= 25,
                avg_rating: history.avg_rating,
                reports_filed: u32::from(!good),
                chat_messages: if good { 6 } else { 1 },
                ride_repeated: good,
            };
            samples.push(TrainingSample::from_pair(
                left,
                right,
                Some(&history),
                &outcome,
            ));
        }
    }
    samples
}
