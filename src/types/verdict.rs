//! Risk verdict and assessment data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Predicted risk class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskClass {
    Low,
    High,
}

impl RiskClass {
    /// Map a binary class label (0/1) to a risk class
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            RiskClass::High
        } else {
            RiskClass::Low
        }
    }

    pub fn label(self) -> u8 {
        match self {
            RiskClass::Low => 0,
            RiskClass::High => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskClass::Low => "low",
            RiskClass::High => "high",
        }
    }
}

/// Presentation hints for the dashboard, derived only from the class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskVerdict {
    /// Human-readable label
    pub risk_level: String,
    /// Display color token
    pub color: String,
    /// Whether the dashboard should celebrate the result
    pub celebrate: bool,
}

impl RiskVerdict {
    pub fn from_class(class: RiskClass) -> Self {
        match class {
            RiskClass::High => Self {
                risk_level: "High Risk".to_string(),
                color: "#e74c3c".to_string(),
                celebrate: false,
            },
            RiskClass::Low => Self {
                risk_level: "Low Risk".to_string(),
                color: "#27ae60".to_string(),
                celebrate: true,
            },
        }
    }
}

/// Result of scoring one supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierAssessment {
    /// Unique assessment identifier
    pub assessment_id: String,

    /// Request this assessment answers
    pub request_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    /// Predicted class
    pub risk_class: RiskClass,

    /// Presentation hints
    pub verdict: RiskVerdict,

    /// Posterior probability of class 1
    pub probability_risky: f64,

    /// Posterior probability of class 0
    pub probability_safe: f64,

    /// Assessment timestamp
    pub timestamp: DateTime<Utc>,
}

impl SupplierAssessment {
    pub fn new(
        request_id: String,
        risk_class: RiskClass,
        probability_safe: f64,
        probability_risky: f64,
    ) -> Self {
        Self {
            assessment_id: uuid::Uuid::new_v4().to_string(),
            request_id,
            supplier_id: None,
            order_id: None,
            risk_class,
            verdict: RiskVerdict::from_class(risk_class),
            probability_risky,
            probability_safe,
            timestamp: Utc::now(),
        }
    }

    /// Echo caller identifiers
    pub fn with_ids(mut self, supplier_id: Option<String>, order_id: Option<String>) -> Self {
        self.supplier_id = supplier_id;
        self.order_id = order_id;
        self
    }
}

/// Message sent back to the caller for each request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EvaluationResponse {
    Assessed(SupplierAssessment),
    Rejected {
        request_id: String,
        code: String,
        reason: String,
    },
}

impl EvaluationResponse {
    pub fn rejected(request_id: impl Into<String>, code: &str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            request_id: request_id.into(),
            code: code.to_string(),
            reason: reason.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            Self::Assessed(assessment) => &assessment.request_id,
            Self::Rejected { request_id, .. } => request_id,
        }
    }
}
