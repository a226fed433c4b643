//! Feature extraction for supplier risk model training and inference.
//!
//! Training rows and evaluation requests are both mapped onto the same
//! ordered feature vector, so the scaler and classifier always see columns
//! in the order they were fitted with.

use crate::config::RequestLimits;
use crate::error::{Result, RiskError};
use crate::types::supplier::{EvaluationRequest, SupplierRecord};

/// Model input columns, in order
pub const FEATURE_NAMES: [&str; 3] = [
    "delay_days",
    "reliability_score",
    "parameter_change_magnitude",
];

/// Feature values tagged with the columns they belong to
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Pair column names with values; lengths must agree
    pub fn new<S: AsRef<str>>(columns: &[S], values: Vec<f64>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(RiskError::feature_shape(format!(
                "{} column names for {} values",
                columns.len(),
                values.len()
            )));
        }
        Ok(Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Transforms supplier records and requests into model input features.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    limits: RequestLimits,
}

impl FeatureExtractor {
    /// Create a feature extractor enforcing the given request limits.
    pub fn new(limits: RequestLimits) -> Self {
        Self { limits }
    }

    /// Raw feature values of a record, in `FEATURE_NAMES` order.
    pub fn extract(&self, record: &SupplierRecord) -> Vec<f64> {
        vec![
            record.delay_days,
            record.reliability_score,
            record.parameter_change_magnitude,
        ]
    }

    /// Feature vector of a record, tagged with column names.
    pub fn extract_vector(&self, record: &SupplierRecord) -> FeatureVector {
        FeatureVector {
            columns: FEATURE_NAMES.iter().map(|c| c.to_string()).collect(),
            values: self.extract(record),
        }
    }

    /// Validate an evaluation request and turn it into a supplier record.
    ///
    /// A missing field is a shape error; a value outside the form limits is
    /// an invalid request.
    pub fn record_from_request(&self, request: &EvaluationRequest) -> Result<SupplierRecord> {
        let delay_days = require(request.delay_days, FEATURE_NAMES[0])?;
        let reliability_score = require(request.reliability_score, FEATURE_NAMES[1])?;
        let parameter_change_magnitude =
            require(request.parameter_change_magnitude, FEATURE_NAMES[2])?;

        check_range("delay_days", delay_days, self.limits.max_delay_days)?;
        check_range("reliability_score", reliability_score, self.limits.max_percentage)?;
        check_range(
            "parameter_change_magnitude",
            parameter_change_magnitude,
            self.limits.max_percentage,
        )?;

        Ok(SupplierRecord::new(
            delay_days,
            reliability_score,
            parameter_change_magnitude,
        ))
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_NAMES.len()
    }

    /// Get feature names (matching model column order).
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(RequestLimits::default())
    }
}

fn require(value: Option<f64>, name: &str) -> Result<f64> {
    value.ok_or_else(|| RiskError::feature_shape(format!("request is missing feature {name}")))
}

fn check_range(field: &'static str, value: f64, max: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 || value > max {
        return Err(RiskError::InvalidRequest {
            field,
            details: format!("{value} is outside [0, {max}]"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(delay: Option<f64>, reliability: Option<f64>, change: Option<f64>) -> EvaluationRequest {
        EvaluationRequest {
            request_id: "req".to_string(),
            delay_days: delay,
            reliability_score: reliability,
            parameter_change_magnitude: change,
            ..Default::default()
        }
    }

    #[test]
    fn test_feature_extraction() {
        let extractor = FeatureExtractor::default();
        let features = extractor.extract(&SupplierRecord::new(10.0, 50.0, 2.5));

        assert_eq!(features.len(), extractor.feature_count());
        assert_eq!(features, vec![10.0, 50.0, 2.5]);
    }

    #[test]
    fn test_feature_names() {
        let extractor = FeatureExtractor::default();
        let vector = extractor.extract_vector(&SupplierRecord::new(1.0, 2.0, 3.0));

        assert_eq!(extractor.feature_names().len(), 3);
        assert_eq!(vector.columns(), &["delay_days", "reliability_score", "parameter_change_magnitude"]);
    }

    #[test]
    fn test_missing_feature_is_shape_error() {
        let extractor = FeatureExtractor::default();
        let err = extractor
            .record_from_request(&request(Some(2.0), Some(85.0), None))
            .unwrap_err();

        assert!(matches!(err, RiskError::FeatureShape { .. }));
        assert!(err.to_string().contains("parameter_change_magnitude"));
    }

    #[test]
    fn test_out_of_range_request() {
        let extractor = FeatureExtractor::default();

        let err = extractor
            .record_from_request(&request(Some(-1.0), Some(85.0), Some(10.0)))
            .unwrap_err();
        assert!(matches!(err, RiskError::InvalidRequest { field: "delay_days", .. }));

        let err = extractor
            .record_from_request(&request(Some(2.0), Some(101.0), Some(10.0)))
            .unwrap_err();
        assert!(matches!(err, RiskError::InvalidRequest { field: "reliability_score", .. }));

        let err = extractor
            .record_from_request(&request(Some(2.0), Some(85.0), Some(f64::NAN)))
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_vector_length_mismatch() {
        let err = FeatureVector::new(&["a", "b"], vec![1.0]).unwrap_err();
        assert!(matches!(err, RiskError::FeatureShape { .. }));
    }
}
