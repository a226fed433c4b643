use std::io::Write;

use supplier_risk_pipeline::config::AppConfig;
use supplier_risk_pipeline::models::train_from_config;
use supplier_risk_pipeline::types::{EvaluationRequest, EvaluationResponse, RiskClass};
use supplier_risk_pipeline::RiskError;
use tempfile::NamedTempFile;

const HEADER: &str =
    "Supplier_ID,Order_ID,Delay_Days,Supplier_Reliability_Score,Parameter_Change_Magnitude,Supply_Risk_Flag";

/// Risky `{10, 50, 2.5}` and safe `{60, 95, 1.0}` orders, `n` of each
fn two_profile_csv(n: usize) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..n {
        writeln!(file, "SUP{i:03},ORD{:05},10,50,2.5,1", 2 * i).unwrap();
        writeln!(file, "SUP{i:03},ORD{:05},60,95,1.0,0", 2 * i + 1).unwrap();
    }
    file.flush().unwrap();
    file
}

fn config_for(path: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.dataset.path = path.to_string_lossy().into_owned();
    config
}

fn request(delay: f64, reliability: f64, change: Option<f64>) -> EvaluationRequest {
    EvaluationRequest {
        request_id: "req-1".to_string(),
        supplier_id: Some("SUP001".to_string()),
        order_id: Some("ORD00001".to_string()),
        delay_days: Some(delay),
        reliability_score: Some(reliability),
        parameter_change_magnitude: change,
    }
}

#[test]
fn test_train_and_assess_from_csv() {
    let csv = two_profile_csv(50);
    let outcome = train_from_config(&config_for(csv.path())).unwrap();

    assert_eq!(outcome.train_rows, 80);
    assert_eq!(outcome.test_rows, 20);
    assert_eq!(outcome.perturbation.rows, 100);
    // noisy delays of 10 never fall below the relabel threshold
    assert_eq!(outcome.perturbation.relabel_candidates, 0);
    assert_eq!(outcome.report.accuracy, 1.0);

    let assessment = outcome.model.assess(&request(55.0, 92.0, Some(1.2))).unwrap();
    assert_eq!(assessment.risk_class, RiskClass::Low);
    assert!(assessment.probability_safe > 0.5);
    assert_eq!(assessment.verdict.risk_level, "Low Risk");
    assert!(assessment.verdict.celebrate);
    assert_eq!(assessment.supplier_id.as_deref(), Some("SUP001"));

    let risky = outcome.model.assess(&request(8.0, 45.0, Some(3.0))).unwrap();
    assert_eq!(risky.risk_class, RiskClass::High);
    assert_eq!(risky.verdict.color, "#e74c3c");
}

#[test]
fn test_missing_feature_is_rejected() {
    let csv = two_profile_csv(20);
    let outcome = train_from_config(&config_for(csv.path())).unwrap();

    let err = outcome.model.assess(&request(55.0, 92.0, None)).unwrap_err();
    assert!(matches!(err, RiskError::FeatureShape { .. }));

    match outcome.model.respond(&request(55.0, 92.0, None)).unwrap() {
        EvaluationResponse::Rejected { code, request_id, .. } => {
            assert_eq!(code, "feature_shape");
            assert_eq!(request_id, "req-1");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_scaler_unchanged_after_many_requests() {
    let csv = two_profile_csv(30);
    let outcome = train_from_config(&config_for(csv.path())).unwrap();
    let before = outcome.model.scaler().clone();

    for i in 0..200 {
        let delay = f64::from(i % 60);
        outcome.model.assess(&request(delay, 70.0, Some(1.5))).unwrap();
    }

    assert_eq!(outcome.model.scaler(), &before);
}

#[test]
fn test_response_json_shape() {
    let csv = two_profile_csv(20);
    let outcome = train_from_config(&config_for(csv.path())).unwrap();

    let response = outcome.model.respond(&request(55.0, 92.0, Some(1.2))).unwrap();
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], "assessed");
    assert_eq!(json["risk_class"], "low");
    assert_eq!(json["verdict"]["risk_level"], "Low Risk");
    let total = json["probability_safe"].as_f64().unwrap() + json["probability_risky"].as_f64().unwrap();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn test_missing_file_fails_training() {
    let config = config_for(std::path::Path::new("/nonexistent/supplier/data.csv"));
    let err = train_from_config(&config).unwrap_err();

    assert!(matches!(err, RiskError::DataLoad { .. }));
    assert_eq!(err.code(), "data_load");
}

#[test]
fn test_missing_column_fails_training() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Delay_Days,Supplier_Reliability_Score,Supply_Risk_Flag").unwrap();
    writeln!(file, "10,50,1").unwrap();
    file.flush().unwrap();

    let err = train_from_config(&config_for(file.path())).unwrap_err();
    assert!(matches!(err, RiskError::DataLoad { .. }));
    assert!(err.to_string().contains("Parameter_Change_Magnitude"));
}

#[test]
fn test_shipped_config_and_dataset() {
    let config = AppConfig::load_from_path("config/config.toml").unwrap();
    assert_eq!(config.nats.evaluation_subject, "supplier.evaluations");

    let outcome = train_from_config(&config).unwrap();
    assert_eq!(outcome.train_rows + outcome.test_rows, 300);
    assert!(outcome.report.accuracy > 0.8);
}

#[test]
fn test_nan_cell_fails_training() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..10 {
        writeln!(file, "SUP{i:03},ORD{:05},10,50,2.5,1", 2 * i).unwrap();
        writeln!(file, "SUP{i:03},ORD{:05},60,95,1.0,0", 2 * i + 1).unwrap();
    }
    writeln!(file, "SUP999,ORD99999,12,NaN,2.4,1").unwrap();
    file.flush().unwrap();

    let err = train_from_config(&config_for(file.path())).unwrap_err();
    assert!(matches!(err, RiskError::DataLoad { .. }));
    assert!(err.to_string().contains("Supplier_Reliability_Score must be finite"));
}
