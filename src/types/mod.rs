//! Type definitions for the supplier risk pipeline

pub mod supplier;
pub mod verdict;

pub use supplier::{EvaluationRequest, LabeledSupplierRecord, SupplierRecord};
pub use verdict::{EvaluationResponse, RiskClass, RiskVerdict, SupplierAssessment};
