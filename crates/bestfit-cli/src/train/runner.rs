use anyhow::{Context, Result};
use bestfit_classifiers::io::read_array;
use bestfit_classifiers::{Trainer, TrainerConfig, TrainingOutcome};
use log::info;

/// Read both arrays named by `config` and run the trainer on them.
pub fn run_training(config: &TrainerConfig) -> Result<TrainingOutcome> {
    let train = read_array(&config.train_array_path).with_context(|| {
        format!(
            "Failed to load train array: {}",
            config.train_array_path.display()
        )
    })?;
    let test = read_array(&config.test_array_path).with_context(|| {
        format!(
            "Failed to load test array: {}",
            config.test_array_path.display()
        )
    })?;
    info!(
        "loaded train {:?} and test {:?} arrays",
        train.shape(),
        test.shape()
    );

    let outcome = Trainer::new(config.clone())
        .train(&train, &test)
        .context("Model training failed")?;
    Ok(outcome)
}
