use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Supported model families and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum ModelType {
    RandomForest {
        n_estimators: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
        bootstrap: bool,
        random_state: u64,
    },
    GBDT {
        learning_rate: f32,
        max_depth: u32,
        num_boost_round: u32,
        debug: bool,
        training_optimization_level: u8,
        loss_type: String,
    },
    DecisionTree {
        max_depth: Option<usize>,
        min_samples_split: usize,
        min_samples_leaf: usize,
    },
}

impl ModelType {
    pub fn random_forest(random_state: u64) -> Self {
        ModelType::RandomForest {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            random_state,
        }
    }

    pub fn gbdt() -> Self {
        ModelType::GBDT {
            learning_rate: 0.1,
            max_depth: 6,
            num_boost_round: 50,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        }
    }

    pub fn decision_tree() -> Self {
        ModelType::DecisionTree {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    /// The registry entries in their fixed order. The order doubles as the
    /// tie-break order when two models report the same score.
    pub fn defaults(random_state: u64) -> Vec<ModelType> {
        vec![
            Self::random_forest(random_state),
            Self::gbdt(),
            Self::decision_tree(),
        ]
    }

    /// Identifier used in score reports and logs.
    pub fn identifier(&self) -> &'static str {
        match self {
            ModelType::RandomForest { .. } => "random_forest",
            ModelType::GBDT { .. } => "gradient_boosting",
            ModelType::DecisionTree { .. } => "decision_tree",
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_forest" | "rf" => Ok(ModelType::random_forest(42)),
            "gradient_boosting" | "gbdt" => Ok(ModelType::gbdt()),
            "decision_tree" | "dt" => Ok(ModelType::decision_tree()),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: random_forest, gradient_boosting, decision_tree",
                s
            )),
        }
    }
}

/// Higher-is-better metric used to rank the registry.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Accuracy,
    BalancedAccuracy,
    MacroF1,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "accuracy" => Ok(Metric::Accuracy),
            "balanced_accuracy" => Ok(Metric::BalancedAccuracy),
            "macro_f1" | "f1" => Ok(Metric::MacroF1),
            _ => Err(format!(
                "Unknown metric: {}. Valid options are: accuracy, balanced_accuracy, macro_f1",
                s
            )),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Accuracy => "accuracy",
            Metric::BalancedAccuracy => "balanced_accuracy",
            Metric::MacroF1 => "macro_f1",
        };
        f.write_str(name)
    }
}

/// Everything a training run needs to know about its surroundings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TrainerConfig {
    pub train_array_path: PathBuf,
    pub test_array_path: PathBuf,
    /// Destination of the fitted artifact; overwritten on every run.
    pub model_save_path: PathBuf,
    pub metric: Metric,
    /// Fit registry entries on the rayon pool instead of one after another.
    pub parallel: bool,
    pub random_state: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            train_array_path: PathBuf::from("artifacts").join("train_arr.json"),
            test_array_path: PathBuf::from("artifacts").join("test_arr.json"),
            model_save_path: PathBuf::from("artifacts").join("model.json"),
            metric: Metric::Accuracy,
            parallel: false,
            random_state: 42,
        }
    }
}

impl TrainerConfig {
    pub fn with_model_save_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_save_path = path.into();
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_registry_order() {
        let ids: Vec<_> = ModelType::defaults(0).iter().map(|m| m.identifier()).collect();
        assert_eq!(ids, ["random_forest", "gradient_boosting", "decision_tree"]);
    }

    #[test]
    fn model_type_from_str() {
        assert_eq!("gbdt".parse::<ModelType>(), Ok(ModelType::gbdt()));
        assert_eq!("DT".parse::<ModelType>(), Ok(ModelType::decision_tree()));
        assert!("svm".parse::<ModelType>().is_err());
    }

    #[test]
    fn metric_names_round_trip() {
        for metric in [Metric::Accuracy, Metric::BalancedAccuracy, Metric::MacroF1] {
            assert_eq!(metric.to_string().parse::<Metric>(), Ok(metric));
            let json = serde_json::to_string(&metric).unwrap();
            assert_eq!(json, format!("\"{}\"", metric));
        }
    }

    #[test]
    fn empty_config_json_is_the_default() {
        let config: TrainerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TrainerConfig::default());
        assert_eq!(config.model_save_path, PathBuf::from("artifacts/model.json"));
    }

    #[test]
    fn model_type_json_is_tagged_by_variant() {
        let json = serde_json::to_value(ModelType::decision_tree()).unwrap();
        assert!(json.get("DecisionTree").is_some());
        let back: ModelType = serde_json::from_value(json).unwrap();
        assert_eq!(back, ModelType::decision_tree());
    }
}
