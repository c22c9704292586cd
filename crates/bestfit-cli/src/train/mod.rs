pub mod input;
pub mod runner;

pub use input::{load_trainer_config, ConfigOverrides};
pub use runner::run_training;
