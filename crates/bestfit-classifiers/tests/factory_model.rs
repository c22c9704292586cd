use bestfit_classifiers::config::ModelType;
use bestfit_classifiers::math::Array2;
use bestfit_classifiers::models::classifier::Classifier;
use bestfit_classifiers::models::classifier_trait::ClassifierModel;
use bestfit_classifiers::models::factory;

fn tiny_dataset() -> (Array2<f32>, Vec<i32>) {
    let x = Array2::from_shape_vec(
        (6, 2),
        vec![
            1.0, 0.0, // class 1
            0.0, 1.0, // class 0
            1.0, 0.1, // class 1
            0.0, 0.9, // class 0
            1.1, 0.0, // class 1
            0.0, 1.2, // class 0
        ],
    )
    .expect("failed to create feature matrix");
    (x, vec![1, 0, 1, 0, 1, 0])
}

#[test]
fn test_factory_builds_and_predicts() {
    let (x, y) = tiny_dataset();

    for model_type in ModelType::defaults(42) {
        let name = model_type.identifier();
        let mut model = factory::build_model(model_type);
        assert_eq!(model.name(), name);
        assert!(!model.is_fitted());

        model.fit(&x, &y).unwrap();
        assert!(model.is_fitted());
        assert_eq!(model.predict(&x).unwrap(), y, "{} should fit the training set", name);
    }
}

#[test]
fn factory_respects_variant() {
    assert!(matches!(
        factory::build_model(ModelType::random_forest(1)),
        Classifier::RandomForest(_)
    ));
    assert!(matches!(
        factory::build_model(ModelType::gbdt()),
        Classifier::GradientBoosting(_)
    ));
    assert!(matches!(
        factory::build_model(ModelType::decision_tree()),
        Classifier::DecisionTree(_)
    ));
}

#[test]
fn multiclass_labels_survive_prediction() {
    let x = Array2::from_shape_vec(
        (9, 1),
        vec![0.0, 0.1, 0.2, 5.0, 5.1, 5.2, 10.0, 10.1, 10.2],
    )
    .unwrap();
    let y = vec![-3, -3, -3, 8, 8, 8, 20, 20, 20];

    for model_type in ModelType::defaults(3) {
        let mut model = factory::build_model(model_type);
        model.fit(&x, &y).unwrap();
        let predicted = model.predict(&x).unwrap();
        assert_eq!(predicted, y, "{}", model.name());
    }
}
