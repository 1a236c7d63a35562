#[cfg(not(any(all(target_os = "macos", target_arch = "aarch64"), target_os = "ios")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use clf_serve_model::dataset::{load_csv, make_classification};
use clf_serve_model::{Algorithm, TrainOptions, accuracy, fit, write_artifact};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fit a classifier and write it where the runtime expects its artifact.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Artifact destination, overwritten if present
    #[arg(long, env = "MODEL_PATH", default_value = "/mnt/data/model.clf")]
    output: PathBuf,

    /// logistic-regression, decision-tree or gaussian-nb
    #[arg(long, default_value_t = Algorithm::LogisticRegression)]
    algorithm: Algorithm,

    /// Train on a CSV file (features then integer label) instead of synthetic data
    #[arg(long)]
    csv: Option<PathBuf>,

    #[arg(long, requires = "csv")]
    has_headers: bool,

    #[arg(long, default_value_t = 100)]
    samples: usize,

    #[arg(long, default_value_t = 4)]
    features: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 100)]
    max_iterations: u64,

    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let dataset = match &args.csv {
        Some(path) => {
            tracing::info!("Loading dataset from {}...", path.display());
            load_csv(path, args.has_headers)?
        }
        None => {
            tracing::info!(
                samples = args.samples,
                features = args.features,
                seed = args.seed,
                "Generating dummy dataset..."
            );
            make_classification(args.samples, args.features, args.seed)?
        }
    };

    tracing::info!("Training {} model...", args.algorithm);
    let options = TrainOptions {
        algorithm: args.algorithm,
        max_iterations: args.max_iterations,
        max_depth: args.max_depth,
    };
    let model = fit(&dataset, &options)?;

    let metrics = accuracy(&model, &dataset)?;
    tracing::info!(
        "Training accuracy: {:.4} ({}/{} correct)",
        metrics.accuracy,
        metrics.correct_count,
        metrics.total_count
    );

    tracing::info!("Saving model to {}...", args.output.display());
    write_artifact(&model, &args.output)?;
    tracing::info!("Done.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["clf-serve-trainer", "--output", "model.clf"]).unwrap();
        assert_eq!(args.algorithm, Algorithm::LogisticRegression);
        assert_eq!(args.samples, 100);
        assert_eq!(args.features, 4);
        assert_eq!(args.seed, 42);
        assert!(args.csv.is_none());
    }

    #[test]
    fn test_algorithm_flag() {
        let args = Args::try_parse_from([
            "clf-serve-trainer",
            "--output",
            "model.clf",
            "--algorithm",
            "decision-tree",
            "--max-depth",
            "3",
        ])
        .unwrap();
        assert_eq!(args.algorithm, Algorithm::DecisionTree);
        assert_eq!(args.max_depth, Some(3));

        assert!(
            Args::try_parse_from(["clf-serve-trainer", "--algorithm", "svm"]).is_err()
        );
    }
}
