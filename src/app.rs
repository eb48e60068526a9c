//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - sets up logging
//! - trains, evaluates and saves the model
//! - reloads it and prints one prediction
//! - writes optional exports

use std::io::Write;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, PredictArgs, RunArgs, TrainArgs};
use crate::domain::{ForestSettings, PipelineSettings, TrainConfig};
use crate::error::AppError;
use crate::io::{MetricsReport, ModelArtifact, load_model, save_model, write_metrics_json, write_predictions_csv};
use crate::report::{format_prediction, format_run_summary};

pub mod pipeline;

use pipeline::TrainingRun;

/// Entry point for the `house-price` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    let cli = parse_args(std::env::args().collect()).unwrap_or_else(|e| e.exit());
    crate::logging::init(cli.verbose);

    let stdout = std::io::stdout();
    execute(cli, &mut stdout.lock())
}

/// Parse argv the way the binary does, including the default-`run` rewrite.
pub fn parse_args(argv: Vec<String>) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(rewrite_args(argv))
}

/// Run a parsed command. Report lines and the prediction go to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> Result<(), AppError> {
    match cli.command {
        Command::Run(args) => handle_run(args, out),
        Command::Train(args) => handle_train(args, out),
        Command::Predict(args) => handle_predict(args, out),
    }
}

fn handle_run(args: RunArgs, out: &mut impl Write) -> Result<(), AppError> {
    let config = train_config_from_args(&args.train);
    let run = pipeline::run_training(&config)?;

    if args.summary {
        emit(out, &format_run_summary(&run, &config))?;
    }
    write_exports(&run, &config)?;

    save_model(&config.model_path, &ModelArtifact::new(run.pipeline, run.n_train))?;
    let artifact = load_model(&config.model_path)?;

    let house = args.house.to_record();
    let prediction = artifact.pipeline.predict(&house)?;
    info!(sale_price = prediction.sale_price, "Predicted sample house");
    emit(out, &format_prediction(&prediction))?;

    if !args.no_wait {
        crate::console::wait_for_keypress()?;
    }
    Ok(())
}

fn handle_train(args: TrainArgs, out: &mut impl Write) -> Result<(), AppError> {
    let config = train_config_from_args(&args);
    let run = pipeline::run_training(&config)?;

    emit(out, &format_run_summary(&run, &config))?;
    write_exports(&run, &config)?;

    save_model(&config.model_path, &ModelArtifact::new(run.pipeline, run.n_train))?;
    emit(out, &format!("Model saved to {}", config.model_path.display()))
}

fn handle_predict(args: PredictArgs, out: &mut impl Write) -> Result<(), AppError> {
    let artifact = load_model(&args.model)?;
    let prediction = artifact.pipeline.predict(&args.house.to_record())?;
    emit(out, &format_prediction(&prediction))
}

fn emit(out: &mut impl Write, text: &str) -> Result<(), AppError> {
    writeln!(out, "{text}")
        .and_then(|()| out.flush())
        .map_err(|e| AppError::input(format!("Failed to write output: {e}")))
}

fn write_exports(run: &TrainingRun, config: &TrainConfig) -> Result<(), AppError> {
    if let Some(path) = &config.export_metrics {
        let report = MetricsReport {
            tool: "house-price".to_string(),
            dataset: run.ingest.stats.clone(),
            train_rows: run.n_train,
            test_fraction: config.test_fraction,
            settings: config.pipeline.clone(),
            classes: run.pipeline.n_classes(),
            metrics: run.metrics.clone(),
        };
        write_metrics_json(path, &report)?;
        info!(path = %path.display(), "Wrote metrics");
    }
    if let Some(path) = &config.export_predictions {
        write_predictions_csv(path, &run.test_rows, &run.scored)?;
        info!(path = %path.display(), "Wrote test predictions");
    }
    Ok(())
}

pub fn train_config_from_args(args: &TrainArgs) -> TrainConfig {
    TrainConfig {
        data_path: args.data.clone(),
        model_path: args.model.clone(),
        test_fraction: args.test_fraction,
        pipeline: PipelineSettings {
            replace_missing: args.replace_missing,
            forest: ForestSettings {
                trees: args.trees,
                max_depth: args.max_depth,
                min_samples_leaf: args.min_samples_leaf,
                feature_fraction: args.feature_fraction,
            },
            seed: args.seed,
        },
        export_metrics: args.export_metrics.clone(),
        export_predictions: args.export_predictions.clone(),
    }
}

/// Rewrite argv so `house-price` defaults to `house-price run`.
///
/// Rules:
/// - `house-price`                      -> `house-price run`
/// - `house-price --seed 7 ...`         -> `house-price run --seed 7 ...`
/// - `house-price -v train ...`         -> unchanged (`-v` is global)
/// - `house-price -v --seed 7 ...`      -> `house-price -v run --seed 7 ...`
/// - `house-price --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    // Global verbosity flags may precede the subcommand.
    let first = argv
        .iter()
        .skip(1)
        .position(|a| !is_verbosity_flag(a))
        .map(|p| p + 1);

    let Some(at) = first else {
        argv.push("run".to_string());
        return argv;
    };
    let arg = argv[at].as_str();

    let is_top_level_help_or_version = matches!(arg, "-h" | "--help" | "-V" | "--version" | "help");
    let is_subcommand = matches!(arg, "run" | "train" | "predict");
    if is_top_level_help_or_version || is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg.starts_with('-') {
        argv.insert(at, "run".to_string());
    }
    argv
}

fn is_verbosity_flag(arg: &str) -> bool {
    arg == "--verbose" || (arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(argv(&["house-price"])), argv(&["house-price", "run"]));
    }

    #[test]
    fn leading_flags_go_to_run() {
        assert_eq!(
            rewrite_args(argv(&["house-price", "--seed", "7"])),
            argv(&["house-price", "run", "--seed", "7"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["house-price", "train"]),
            argv(&["house-price", "predict", "--model", "m"]),
            argv(&["house-price", "--help"]),
            argv(&["house-price", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn leading_verbosity_keeps_the_subcommand() {
        assert_eq!(
            rewrite_args(argv(&["house-price", "-v", "train"])),
            argv(&["house-price", "-v", "train"])
        );
        assert_eq!(rewrite_args(argv(&["house-price", "-vv"])), argv(&["house-price", "-vv", "run"]));
        assert_eq!(
            rewrite_args(argv(&["house-price", "--verbose", "--seed", "7"])),
            argv(&["house-price", "--verbose", "run", "--seed", "7"])
        );
    }

    #[test]
    fn parsed_argv_reaches_the_right_command() {
        let cases: [(&[&str], &str, u8); 7] = [
            (&["house-price"], "run", 0),
            (&["house-price", "--no-wait"], "run", 0),
            (&["house-price", "-v", "train"], "train", 1),
            (&["house-price", "-vv", "predict", "--model", "m.bin.gz"], "predict", 2),
            (&["house-price", "predict", "-v", "--model", "m.bin.gz"], "predict", 1),
            (&["house-price", "--verbose", "--seed", "7"], "run", 1),
            (&["house-price", "-v", "-v", "run", "--summary"], "run", 2),
        ];
        for (args, expected, verbose) in cases {
            let cli = parse_args(argv(args)).unwrap_or_else(|e| panic!("{args:?}: {e}"));
            let name = match cli.command {
                Command::Run(_) => "run",
                Command::Train(_) => "train",
                Command::Predict(_) => "predict",
            };
            assert_eq!(name, expected, "{args:?}");
            assert_eq!(cli.verbose, verbose, "{args:?}");
        }
    }

    #[test]
    fn config_carries_forest_flags() {
        let cli = crate::cli::Cli::try_parse_from(argv(&[
            "house-price",
            "train",
            "--trees",
            "12",
            "--min-samples-leaf",
            "3",
            "--seed",
            "9",
        ]))
        .unwrap();
        let Command::Train(args) = cli.command else {
            panic!("expected train");
        };
        let config = train_config_from_args(&args);
        assert_eq!(config.pipeline.forest.trees, 12);
        assert_eq!(config.pipeline.forest.min_samples_leaf, 3);
        assert_eq!(config.pipeline.seed, 9);
        assert_eq!(config.pipeline.forest.max_depth, 5);
    }
}
