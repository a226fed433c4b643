//! Supplier record and evaluation request data structures

use serde::{Deserialize, Serialize};

/// Performance attributes of one supplier order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplierRecord {
    /// Days the delivery was late (non-negative)
    #[serde(alias = "Delay_Days")]
    pub delay_days: f64,

    /// Supplier reliability score (percentage scale)
    #[serde(alias = "Supplier_Reliability_Score")]
    pub reliability_score: f64,

    /// Magnitude of process parameter changes (percentage scale)
    #[serde(alias = "Parameter_Change_Magnitude")]
    pub parameter_change_magnitude: f64,
}

impl SupplierRecord {
    pub fn new(delay_days: f64, reliability_score: f64, parameter_change_magnitude: f64) -> Self {
        Self {
            delay_days,
            reliability_score,
            parameter_change_magnitude,
        }
    }
}

/// Training row: a supplier record with its historical risk label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledSupplierRecord {
    pub record: SupplierRecord,

    /// 1 = historically risky, 0 = not
    pub supply_risk_flag: u8,
}

impl LabeledSupplierRecord {
    pub fn new(record: SupplierRecord, supply_risk_flag: u8) -> Self {
        Self {
            record,
            supply_risk_flag,
        }
    }

    pub fn is_risky(&self) -> bool {
        self.supply_risk_flag == 1
    }
}

/// Request to score one supplier, as sent by the dashboard form.
///
/// Feature fields are optional on the wire so that an omitted field is
/// reported as a shape error instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Caller correlation id (generated when absent)
    #[serde(default = "new_request_id")]
    pub request_id: String,

    /// Supplier identifier, echoed back only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,

    /// Order identifier, echoed back only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,

    #[serde(default, alias = "Delay_Days")]
    pub delay_days: Option<f64>,

    #[serde(default, alias = "Supplier_Reliability_Score")]
    pub reliability_score: Option<f64>,

    #[serde(default, alias = "Parameter_Change_Magnitude")]
    pub parameter_change_magnitude: Option<f64>,
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl EvaluationRequest {
    /// Create a complete request from a supplier record
    pub fn from_record(record: SupplierRecord) -> Self {
        Self {
            request_id: new_request_id(),
            supplier_id: None,
            order_id: None,
            delay_days: Some(record.delay_days),
            reliability_score: Some(record.reliability_score),
            parameter_change_magnitude: Some(record.parameter_change_magnitude),
        }
    }

    /// Attach caller identifiers
    pub fn with_ids(mut self, supplier_id: impl Into<String>, order_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self.order_id = Some(order_id.into());
        self
    }
}
