//! Supplier risk inference on the trained model

use crate::error::Result;
use crate::feature_extractor::FeatureExtractor;
use crate::models::naive_bayes::GaussianNaiveBayes;
use crate::models::scaler::StandardScaler;
use crate::types::supplier::{EvaluationRequest, SupplierRecord};
use crate::types::verdict::{EvaluationResponse, RiskClass, SupplierAssessment};
use tracing::debug;

/// Prediction for one scaled record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskPrediction {
    pub risk_class: RiskClass,
    pub probability_safe: f64,
    pub probability_risky: f64,
}

/// Fitted scaler and classifier, bundled.
///
/// Constructed once at startup and shared read-only (behind an `Arc`) with
/// every inference call; nothing here refits either component.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    extractor: FeatureExtractor,
    scaler: StandardScaler,
    classifier: GaussianNaiveBayes,
}

impl TrainedModel {
    pub fn new(
        extractor: FeatureExtractor,
        scaler: StandardScaler,
        classifier: GaussianNaiveBayes,
    ) -> Self {
        Self {
            extractor,
            scaler,
            classifier,
        }
    }

    /// Score a record with the training-fitted scaler and classifier
    pub fn predict(&self, record: &SupplierRecord) -> Result<RiskPrediction> {
        let features = self.extractor.extract_vector(record);
        let scaled = self.scaler.transform(&features)?;

        let class = self.classifier.predict_class(&scaled)?;
        let [probability_safe, probability_risky] = self.classifier.predict_proba(&scaled)?;

        Ok(RiskPrediction {
            risk_class: RiskClass::from_label(class),
            probability_safe,
            probability_risky,
        })
    }

    /// Validate and score one evaluation request
    pub fn assess(&self, request: &EvaluationRequest) -> Result<SupplierAssessment> {
        let record = self.extractor.record_from_request(request)?;
        let prediction = self.predict(&record)?;

        debug!(
            request_id = %request.request_id,
            risk_class = prediction.risk_class.as_str(),
            probability_risky = prediction.probability_risky,
            "Supplier assessed"
        );

        Ok(SupplierAssessment::new(
            request.request_id.clone(),
            prediction.risk_class,
            prediction.probability_safe,
            prediction.probability_risky,
        )
        .with_ids(request.supplier_id.clone(), request.order_id.clone()))
    }

    /// Assess a request, turning recoverable failures into a rejection
    pub fn respond(&self, request: &EvaluationRequest) -> Result<EvaluationResponse> {
        match self.assess(request) {
            Ok(assessment) => Ok(EvaluationResponse::Assessed(assessment)),
            Err(e) if e.is_recoverable() => Ok(EvaluationResponse::rejected(
                request.request_id.clone(),
                e.code(),
                e.to_string(),
            )),
            Err(e) => Err(e),
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &GaussianNaiveBayes {
        &self.classifier
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiskError;
    use crate::feature_extractor::FEATURE_NAMES;

    /// Risky `{10, 50, 2.5}` and safe `{60, 95, 1.0}` suppliers, repeated
    fn trained_on_two_profiles() -> TrainedModel {
        let extractor = FeatureExtractor::default();
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..50 {
            rows.push(extractor.extract(&SupplierRecord::new(10.0, 50.0, 2.5)));
            labels.push(1);
            rows.push(extractor.extract(&SupplierRecord::new(60.0, 95.0, 1.0)));
            labels.push(0);
        }

        let scaler = StandardScaler::fit(&FEATURE_NAMES, &rows).unwrap();
        let scaled = scaler.transform_rows(&rows).unwrap();
        let classifier = GaussianNaiveBayes::fit(&scaled, &labels, 1e-9).unwrap();
        TrainedModel::new(extractor, scaler, classifier)
    }

    #[test]
    fn test_reliable_supplier_is_low_risk() {
        let model = trained_on_two_profiles();
        let request = EvaluationRequest::from_record(SupplierRecord::new(55.0, 92.0, 1.2));

        let assessment = model.assess(&request).unwrap();
        assert_eq!(assessment.risk_class, RiskClass::Low);
        assert!(assessment.probability_safe > 0.5);
        assert!(assessment.verdict.celebrate);
        assert_eq!(assessment.verdict.risk_level, "Low Risk");
    }

    #[test]
    fn test_risky_supplier_is_high_risk() {
        let model = trained_on_two_profiles();
        let request = EvaluationRequest::from_record(SupplierRecord::new(12.0, 48.0, 2.4))
            .with_ids("SUP1", "ORD1");

        let assessment = model.assess(&request).unwrap();
        assert_eq!(assessment.risk_class, RiskClass::High);
        assert!(assessment.probability_risky > 0.5);
        assert!(!assessment.verdict.celebrate);
        assert_eq!(assessment.supplier_id.as_deref(), Some("SUP1"));
        assert_eq!(assessment.request_id, request.request_id);
    }

    #[test]
    fn test_missing_feature_is_rejected() {
        let model = trained_on_two_profiles();
        let mut request = EvaluationRequest::from_record(SupplierRecord::new(55.0, 92.0, 1.2));
        request.parameter_change_magnitude = None;

        let err = model.assess(&request).unwrap_err();
        assert!(matches!(err, RiskError::FeatureShape { .. }));

        match model.respond(&request).unwrap() {
            EvaluationResponse::Rejected { code, request_id, .. } => {
                assert_eq!(code, "feature_shape");
                assert_eq!(request_id, request.request_id);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_inference_never_refits_scaler() {
        let model = trained_on_two_profiles();
        let before = model.scaler().clone();

        for record in [
            SupplierRecord::new(55.0, 92.0, 1.2),
            SupplierRecord::new(0.0, 0.0, 0.0),
            SupplierRecord::new(60.0, 100.0, 100.0),
        ] {
            model.assess(&EvaluationRequest::from_record(record)).unwrap();
        }

        assert_eq!(model.scaler(), &before);
    }

    #[test]
    fn test_single_row_refit_discards_the_record() {
        // Regression guard: fitting a fresh scaler on the incoming record
        // standardizes every feature to zero, so any two records become
        // indistinguishable. Inference must keep using the training scaler.
        let model = trained_on_two_profiles();
        let extractor = FeatureExtractor::default();

        let refit_scores: Vec<[f64; 2]> = [
            SupplierRecord::new(55.0, 92.0, 1.2),
            SupplierRecord::new(12.0, 48.0, 2.4),
        ]
        .iter()
        .map(|record| {
            let raw = vec![extractor.extract(record)];
            let refit = StandardScaler::fit(&FEATURE_NAMES, &raw).unwrap();
            let scaled = refit.transform_values(&raw[0]).unwrap();
            assert_eq!(scaled, vec![0.0, 0.0, 0.0]);
            model.classifier().predict_proba(&scaled).unwrap()
        })
        .collect();
        assert_eq!(refit_scores[0], refit_scores[1]);

        let safe = model.predict(&SupplierRecord::new(55.0, 92.0, 1.2)).unwrap();
        let risky = model.predict(&SupplierRecord::new(12.0, 48.0, 2.4)).unwrap();
        assert_ne!(safe.risk_class, risky.risk_class);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let model = trained_on_two_profiles();
        let prediction = model.predict(&SupplierRecord::new(35.0, 72.5, 1.75)).unwrap();

        assert!((prediction.probability_safe + prediction.probability_risky - 1.0).abs() < 1e-9);
    }
}
