//! Classification metrics used to rank the registry. All are higher-is-better
//! and lie in [0, 1].

use crate::config::Metric;
use crate::data_handling::unique_classes;
use crate::error::MetricError;

impl Metric {
    pub fn score(&self, truth: &[i32], predicted: &[i32]) -> Result<f64, MetricError> {
        match self {
            Metric::Accuracy => accuracy(truth, predicted),
            Metric::BalancedAccuracy => balanced_accuracy(truth, predicted),
            Metric::MacroF1 => macro_f1(truth, predicted),
        }
    }
}

fn check(truth: &[i32], predicted: &[i32]) -> Result<(), MetricError> {
    if truth.len() != predicted.len() {
        return Err(MetricError::LengthMismatch {
            truth: truth.len(),
            predicted: predicted.len(),
        });
    }
    if truth.is_empty() {
        return Err(MetricError::Empty);
    }
    Ok(())
}

/// Fraction of predictions equal to the true label.
pub fn accuracy(truth: &[i32], predicted: &[i32]) -> Result<f64, MetricError> {
    check(truth, predicted)?;
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / truth.len() as f64)
}

/// Mean per-class recall over the classes present in `truth`.
pub fn balanced_accuracy(truth: &[i32], predicted: &[i32]) -> Result<f64, MetricError> {
    check(truth, predicted)?;
    let classes = unique_classes(truth);
    let recall_sum: f64 = classes
        .iter()
        .map(|&class| {
            let support = truth.iter().filter(|&&t| t == class).count();
            let hits = truth
                .iter()
                .zip(predicted)
                .filter(|(&t, &p)| t == class && p == class)
                .count();
            hits as f64 / support as f64
        })
        .sum();
    Ok(recall_sum / classes.len() as f64)
}

/// Unweighted mean of per-class F1 over the union of true and predicted
/// classes. A class with no true and no predicted samples cannot occur; a
/// class with zero precision and recall contributes 0.
pub fn macro_f1(truth: &[i32], predicted: &[i32]) -> Result<f64, MetricError> {
    check(truth, predicted)?;
    let mut labels: Vec<i32> = truth.iter().chain(predicted).copied().collect();
    labels.sort_unstable();
    labels.dedup();

    let f1_sum: f64 = labels
        .iter()
        .map(|&class| {
            let mut tp = 0usize;
            let mut fp = 0usize;
            let mut fn_ = 0usize;
            for (&t, &p) in truth.iter().zip(predicted) {
                match (t == class, p == class) {
                    (true, true) => tp += 1,
                    (false, true) => fp += 1,
                    (true, false) => fn_ += 1,
                    (false, false) => {}
                }
            }
            if tp == 0 {
                0.0
            } else {
                2.0 * tp as f64 / (2 * tp + fp + fn_) as f64
            }
        })
        .sum();
    Ok(f1_sum / labels.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRUTH: [i32; 6] = [0, 0, 0, 0, 1, 1];
    const PRED: [i32; 6] = [0, 0, 0, 0, 0, 1];

    #[test]
    fn accuracy_counts_matches() {
        let acc = accuracy(&TRUTH, &PRED).unwrap();
        assert!((acc - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn balanced_accuracy_averages_recall() {
        // recall(0) = 1, recall(1) = 0.5
        let bal = balanced_accuracy(&TRUTH, &PRED).unwrap();
        assert!((bal - 0.75).abs() < 1e-12);
    }

    #[test]
    fn macro_f1_averages_per_class_f1() {
        // f1(0) = 8/9, f1(1) = 2/3
        let f1 = macro_f1(&TRUTH, &PRED).unwrap();
        assert!((f1 - (8.0 / 9.0 + 2.0 / 3.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn perfect_predictions_score_one() {
        for metric in [Metric::Accuracy, Metric::BalancedAccuracy, Metric::MacroF1] {
            assert_eq!(metric.score(&TRUTH, &TRUTH).unwrap(), 1.0);
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(accuracy(&[], &[]).unwrap_err(), MetricError::Empty);
        assert_eq!(
            macro_f1(&[1, 2], &[1]).unwrap_err(),
            MetricError::LengthMismatch {
                truth: 2,
                predicted: 1
            }
        );
    }
}
