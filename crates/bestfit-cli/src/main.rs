use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use bestfit_classifiers::TrainerConfig;
use bestfit_cli::train::{load_trainer_config, run_training, ConfigOverrides};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BESTFIT_LOG", "error,bestfit=info"))
        .init();

    let matches = cli().get_matches();
    handle_train(&matches)
}

fn cli() -> Command {
    Command::new("bestfit")
        .version(clap::crate_version!())
        .about("Fit a fixed set of classifiers, keep the best one on held-out data")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON trainer configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("train")
                .long("train")
                .help(
                    "Path to the train array (label in the last column). \
                     Overrides train_array_path from the configuration file.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("test")
                .long("test")
                .help(
                    "Path to the test array (label in the last column). \
                     Overrides test_array_path from the configuration file.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help(
                    "File the best fitted model is written to (*.json, otherwise bincode). \
                     Overrides model_save_path from the configuration file.",
                )
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("metric")
                .long("metric")
                .help("Metric used to rank the models")
                .value_parser(["accuracy", "balanced_accuracy", "macro_f1"]),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .help("Fit the candidate models concurrently")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print_config")
                .long("print-config")
                .help("Print the effective configuration as JSON and exit")
                .action(ArgAction::SetTrue),
        )
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let base = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_trainer_config(path)?,
        None => TrainerConfig::default(),
    };
    let config = ConfigOverrides::from_matches(matches)?.apply(base);

    if matches.get_flag("print_config") {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    match run_training(&config) {
        Ok(outcome) => {
            log::info!(
                "Training completed: {} ({} = {:.4}) saved to {}",
                outcome.best_model,
                config.metric,
                outcome.best_score,
                outcome.model_path.display()
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
