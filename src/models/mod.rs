//! Supplier risk model: scaler, classifier, training and inference

pub mod evaluation;
pub mod inference;
pub mod naive_bayes;
pub mod scaler;
pub mod training;

pub use evaluation::EvaluationReport;
pub use inference::{RiskPrediction, TrainedModel};
pub use naive_bayes::GaussianNaiveBayes;
pub use scaler::StandardScaler;
pub use training::{train_from_config, TrainingOutcome};
