//! The fixed, ordered set of candidate models considered by each run.

use crate::config::ModelType;
use crate::models::classifier::Classifier;
use crate::models::factory::build_model;

#[derive(Debug)]
pub struct RegistryEntry {
    pub name: &'static str,
    pub model: Classifier,
}

/// Ordered name → model mapping. Iteration order is insertion order and is
/// what breaks ties between equal scores.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: Vec<RegistryEntry>,
}

impl ModelRegistry {
    /// Random forest, gradient boosting, decision tree, in that order.
    pub fn with_defaults(random_state: u64) -> Self {
        Self::from_model_types(ModelType::defaults(random_state))
    }

    pub fn from_model_types(model_types: Vec<ModelType>) -> Self {
        let entries = model_types
            .into_iter()
            .map(|model_type| RegistryEntry {
                name: model_type.identifier(),
                model: build_model(model_type),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [RegistryEntry] {
        &mut self.entries
    }

    /// Remove and return the named model.
    pub fn take(&mut self, name: &str) -> Option<Classifier> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(pos).model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classifier_trait::ClassifierModel;

    #[test]
    fn default_order_is_fixed() {
        let registry = ModelRegistry::with_defaults(42);
        assert_eq!(
            registry.names(),
            vec!["random_forest", "gradient_boosting", "decision_tree"]
        );
        assert!(registry.entries().iter().all(|e| !e.model.is_fitted()));
        assert!(registry.entries().iter().all(|e| e.model.name() == e.name));
    }

    #[test]
    fn take_removes_entry() {
        let mut registry = ModelRegistry::with_defaults(42);
        assert!(matches!(
            registry.take("decision_tree"),
            Some(Classifier::DecisionTree(_))
        ));
        assert_eq!(registry.len(), 2);
        assert!(registry.take("decision_tree").is_none());
        assert_eq!(registry.names(), vec!["random_forest", "gradient_boosting"]);
    }
}
