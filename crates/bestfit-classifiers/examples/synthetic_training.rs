use bestfit_classifiers::math::Array2;
use bestfit_classifiers::persistence::{FileModelStore, ModelStore};
use bestfit_classifiers::{ClassifierModel, Metric, Trainer, TrainerConfig};

fn main() {
    env_logger::init();

    // Three blobs along the diagonal, label in the last column
    let mut rows = Vec::new();
    for i in 0..30 {
        let class = (i % 3) as f32;
        let jitter = (i % 7) as f32 * 0.05;
        rows.push(vec![class * 2.0 + jitter, class * 2.0 - jitter, class]);
    }
    let train = Array2::from_rows(rows.clone()).expect("failed to create train array");
    let test = Array2::from_rows(rows.into_iter().step_by(4).collect())
        .expect("failed to create test array");

    let out_dir = std::env::temp_dir().join("bestfit-synthetic");
    let config = TrainerConfig::default()
        .with_model_save_path(out_dir.join("model.bin"))
        .with_metric(Metric::MacroF1)
        .with_parallel(true);

    let outcome = Trainer::new(config)
        .train(&train, &test)
        .expect("training failed");
    println!("Scores: {}", outcome.report);
    println!("Best: {} ({:.4})", outcome.best_model, outcome.best_score);

    let model = FileModelStore
        .load(&outcome.model_path)
        .expect("failed to load model");
    let features = test.select_columns(..test.ncols() - 1);
    println!("Reloaded predictions: {:?}", model.predict(&features));
}
