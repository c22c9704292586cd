pub mod classifier;
pub mod classifier_trait;
pub mod decision_tree;
pub mod factory;
pub mod gbdt;
pub mod random_forest;
pub mod registry;
