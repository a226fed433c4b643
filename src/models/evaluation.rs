//! Held-out evaluation of the trained classifier

use serde::Serialize;
use tracing::info;

/// Precision, recall and F1 for one class
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// True rows of this class in the test set
    pub support: u64,
}

/// Test-split metrics, in the layout of a classification report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub test_rows: u64,
    pub mislabeled: u64,
    pub accuracy: f64,
    /// `confusion[actual][predicted]`
    pub confusion: [[u64; 2]; 2],
    /// Per-class metrics indexed by label
    pub classes: [ClassMetrics; 2],
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
}

impl EvaluationReport {
    /// Compare predictions against true labels (both 0/1).
    ///
    /// Undefined ratios (no predicted or no actual rows) count as 0.
    pub fn from_predictions(actual: &[u8], predicted: &[u8]) -> Self {
        let mut confusion = [[0u64; 2]; 2];
        for (&truth, &guess) in actual.iter().zip(predicted) {
            confusion[usize::from(truth.min(1))][usize::from(guess.min(1))] += 1;
        }

        let test_rows: u64 = confusion.iter().flatten().sum();
        let correct = confusion[0][0] + confusion[1][1];
        let accuracy = ratio(correct, test_rows);

        let class_metrics = |class: usize| {
            let true_positive = confusion[class][class];
            let predicted_total = confusion[0][class] + confusion[1][class];
            let support = confusion[class][0] + confusion[class][1];
            let precision = ratio(true_positive, predicted_total);
            let recall = ratio(true_positive, support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            }
        };
        let classes = [class_metrics(0), class_metrics(1)];

        let macro_avg = ClassMetrics {
            precision: (classes[0].precision + classes[1].precision) / 2.0,
            recall: (classes[0].recall + classes[1].recall) / 2.0,
            f1: (classes[0].f1 + classes[1].f1) / 2.0,
            support: test_rows,
        };
        let weighted = |metric: fn(&ClassMetrics) -> f64| {
            if test_rows == 0 {
                return 0.0;
            }
            classes
                .iter()
                .map(|c| metric(c) * c.support as f64)
                .sum::<f64>()
                / test_rows as f64
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|c| c.precision),
            recall: weighted(|c| c.recall),
            f1: weighted(|c| c.f1),
            support: test_rows,
        };

        Self {
            test_rows,
            mislabeled: test_rows - correct,
            accuracy,
            confusion,
            classes,
            macro_avg,
            weighted_avg,
        }
    }

    /// Log the report as a table
    pub fn log_summary(&self) {
        info!(
            "Number of mislabeled points out of a total {} points: {}",
            self.test_rows, self.mislabeled
        );
        info!("Accuracy: {:.4}", self.accuracy);
        info!("              precision    recall  f1-score   support");
        for (label, metrics) in self.classes.iter().enumerate() {
            info!(
                "{:>12} {:>11.2} {:>9.2} {:>9.2} {:>9}",
                label, metrics.precision, metrics.recall, metrics.f1, metrics.support
            );
        }
        for (name, metrics) in [("macro avg", &self.macro_avg), ("weighted avg", &self.weighted_avg)] {
            info!(
                "{:>12} {:>11.2} {:>9.2} {:>9.2} {:>9}",
                name, metrics.precision, metrics.recall, metrics.f1, metrics.support
            );
        }
        info!(
            "Confusion matrix: [[{}, {}], [{}, {}]]",
            self.confusion[0][0], self.confusion[0][1], self.confusion[1][0], self.confusion[1][1]
        );
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
