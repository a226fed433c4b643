//! Supplier Risk Pipeline Library
//!
//! Trains a Gaussian Naive Bayes supplier-risk classifier on a perturbed
//! historical table, then answers evaluation requests over NATS with the
//! training-fitted scaler and classifier.

pub mod config;
pub mod consumer;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod producer;
pub mod types;

pub use config::AppConfig;
pub use consumer::EvaluationConsumer;
pub use error::{Result, RiskError};
pub use feature_extractor::FeatureExtractor;
pub use models::{train_from_config, TrainedModel, TrainingOutcome};
pub use producer::AssessmentProducer;
pub use types::{EvaluationRequest, EvaluationResponse, SupplierAssessment, SupplierRecord};
