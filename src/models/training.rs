//! Training pipeline: load → perturb → split → scale → fit → evaluate

use crate::config::{AppConfig, ClassifierConfig, DatasetConfig};
use crate::dataset::{train_test_split, DataLoader, PerturbationSummary};
use crate::error::Result;
use crate::feature_extractor::FeatureExtractor;
use crate::models::evaluation::EvaluationReport;
use crate::models::inference::TrainedModel;
use crate::models::naive_bayes::GaussianNaiveBayes;
use crate::models::scaler::StandardScaler;
use crate::types::supplier::LabeledSupplierRecord;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Everything produced by one training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: TrainedModel,
    pub report: EvaluationReport,
    pub perturbation: PerturbationSummary,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Load the configured dataset and train a model on it
pub fn train_from_config(config: &AppConfig) -> Result<TrainingOutcome> {
    let extractor = FeatureExtractor::new(config.request_limits.clone());
    let mut rng = StdRng::seed_from_u64(config.dataset.perturbation_seed);
    let dataset = DataLoader::new(&config.dataset).load(&mut rng)?;

    let mut outcome = train_on_records(
        dataset.records,
        extractor,
        &config.dataset,
        &config.classifier,
    )?;
    outcome.perturbation = dataset.perturbation;
    Ok(outcome)
}

/// Split already-perturbed records, fit scaler and classifier on the
/// training part and evaluate on the held-out part
pub fn train_on_records(
    records: Vec<LabeledSupplierRecord>,
    extractor: FeatureExtractor,
    dataset: &DatasetConfig,
    classifier: &ClassifierConfig,
) -> Result<TrainingOutcome> {
    let mut split_rng = StdRng::seed_from_u64(dataset.split_seed);
    let split = train_test_split(records, dataset.test_fraction, &mut split_rng)?;

    let (train_x, train_y) = to_matrix(&extractor, &split.train);
    let (test_x, test_y) = to_matrix(&extractor, &split.test);

    let scaler = StandardScaler::fit(extractor.feature_names(), &train_x)?;
    let train_scaled = scaler.transform_rows(&train_x)?;
    let test_scaled = scaler.transform_rows(&test_x)?;

    let model = GaussianNaiveBayes::fit(&train_scaled, &train_y, classifier.var_smoothing)?;
    let predicted = model.predict_rows(&test_scaled)?;
    let report = EvaluationReport::from_predictions(&test_y, &predicted);

    info!(
        train_rows = train_x.len(),
        test_rows = test_x.len(),
        accuracy = report.accuracy,
        degenerate_features = model.degenerate_features().len(),
        "Classifier trained"
    );

    Ok(TrainingOutcome {
        train_rows: train_x.len(),
        test_rows: test_x.len(),
        model: TrainedModel::new(extractor, scaler, model),
        report,
        perturbation: PerturbationSummary::default(),
    })
}

fn to_matrix(
    extractor: &FeatureExtractor,
    rows: &[LabeledSupplierRecord],
) -> (Vec<Vec<f64>>, Vec<u8>) {
    rows.iter()
        .map(|row| (extractor.extract(&row.record), row.supply_risk_flag))
        .unzip()
}
