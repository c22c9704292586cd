use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bestfit_classifiers::{Metric, TrainerConfig};
use clap::ArgMatches;

/// Load a trainer configuration from a JSON file. Missing fields keep their
/// defaults.
pub fn load_trainer_config<P: AsRef<Path>>(path: P) -> Result<TrainerConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainerConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Command line values that take precedence over the configuration file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigOverrides {
    pub train: Option<PathBuf>,
    pub test: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub metric: Option<Metric>,
    pub parallel: bool,
}

impl ConfigOverrides {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let metric = matches
            .get_one::<String>("metric")
            .map(|m| m.parse::<Metric>())
            .transpose()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            train: matches.get_one::<PathBuf>("train").cloned(),
            test: matches.get_one::<PathBuf>("test").cloned(),
            output: matches.get_one::<PathBuf>("output").cloned(),
            metric,
            parallel: matches.get_flag("parallel"),
        })
    }

    pub fn apply(&self, mut config: TrainerConfig) -> TrainerConfig {
        if let Some(train) = &self.train {
            config.train_array_path = train.clone();
        }
        if let Some(test) = &self.test {
            config.test_array_path = test.clone();
        }
        if let Some(output) = &self.output {
            config.model_save_path = output.clone();
        }
        if let Some(metric) = self.metric {
            config.metric = metric;
        }
        // The flag can only switch parallel fitting on.
        if self.parallel {
            config.parallel = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"metric": "macro_f1", "random_state": 7}}"#).unwrap();

        let config = load_trainer_config(file.path()).unwrap();
        assert_eq!(config.metric, Metric::MacroF1);
        assert_eq!(config.random_state, 7);
        assert_eq!(config.model_save_path, TrainerConfig::default().model_save_path);
    }

    #[test]
    fn malformed_config_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_trainer_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }

    #[test]
    fn overrides_win_over_the_file() {
        let overrides = ConfigOverrides {
            output: Some(PathBuf::from("out/best.bin")),
            metric: Some(Metric::BalancedAccuracy),
            parallel: true,
            ..Default::default()
        };
        let config = overrides.apply(TrainerConfig::default());

        assert_eq!(config.model_save_path, PathBuf::from("out/best.bin"));
        assert_eq!(config.metric, Metric::BalancedAccuracy);
        assert!(config.parallel);
        assert_eq!(config.train_array_path, TrainerConfig::default().train_array_path);
    }
}
