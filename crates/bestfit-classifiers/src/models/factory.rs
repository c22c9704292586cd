use crate::config::ModelType;
use crate::models::classifier::Classifier;
use crate::models::decision_tree::DecisionTreeClassifier;
use crate::models::gbdt::GBDTClassifier;
use crate::models::random_forest::RandomForestClassifier;

/// Build an unfitted classifier from its `ModelType`.
pub fn build_model(model_type: ModelType) -> Classifier {
    match model_type {
        ModelType::RandomForest {
            n_estimators,
            max_depth,
            min_samples_split,
            min_samples_leaf,
            bootstrap,
            random_state,
        } => Classifier::RandomForest(
            RandomForestClassifier::new(n_estimators)
                .with_max_depth(max_depth)
                .with_min_samples_split(min_samples_split)
                .with_min_samples_leaf(min_samples_leaf)
                .with_bootstrap(bootstrap)
                .with_random_state(random_state),
        ),

        ModelType::GBDT {
            learning_rate,
            max_depth,
            num_boost_round,
            debug,
            training_optimization_level,
            loss_type,
        } => Classifier::GradientBoosting(GBDTClassifier::new(
            learning_rate,
            max_depth,
            num_boost_round,
            debug,
            training_optimization_level,
            loss_type,
        )),

        ModelType::DecisionTree {
            max_depth,
            min_samples_split,
            min_samples_leaf,
        } => Classifier::DecisionTree(
            DecisionTreeClassifier::new()
                .with_max_depth(max_depth)
                .with_min_samples_split(min_samples_split)
                .with_min_samples_leaf(min_samples_leaf),
        ),
    }
}
