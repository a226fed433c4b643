use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use supplier_risk_pipeline::dataset::perturb::perturb;
use supplier_risk_pipeline::feature_extractor::FEATURE_NAMES;
use supplier_risk_pipeline::models::{GaussianNaiveBayes, StandardScaler};
use supplier_risk_pipeline::types::{LabeledSupplierRecord, SupplierRecord};

fn feature_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(
        (0.0..60.0f64, 0.0..100.0f64, 0.0..5.0f64).prop_map(|(d, r, p)| vec![d, r, p]),
        2..60,
    )
}

fn column(rows: &[Vec<f64>], j: usize) -> Vec<f64> {
    rows.iter().map(|row| row[j]).collect()
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

proptest! {
    #[test]
    fn scaler_standardizes_training_columns(rows in feature_rows()) {
        for j in 0..3 {
            prop_assume!(population_std(&column(&rows, j)) > 1e-6);
        }

        let scaler = StandardScaler::fit(&FEATURE_NAMES, &rows).unwrap();
        let scaled = scaler.transform_rows(&rows).unwrap();

        for j in 0..3 {
            prop_assert!((scaler.means()[j] - mean(&column(&rows, j))).abs() < 1e-9);

            let out = column(&scaled, j);
            prop_assert!(mean(&out).abs() < 1e-9);
            prop_assert!((population_std(&out) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn transform_is_deterministic(rows in feature_rows(), point in (0.0..60.0f64, 0.0..100.0f64, 0.0..5.0f64)) {
        let scaler = StandardScaler::fit(&FEATURE_NAMES, &rows).unwrap();
        let point = [point.0, point.1, point.2];

        let first = scaler.transform_values(&point).unwrap();
        for _ in 0..5 {
            prop_assert_eq!(&scaler.transform_values(&point).unwrap(), &first);
        }
    }

    #[test]
    fn probabilities_form_a_distribution(
        rows in feature_rows(),
        labels_seed in any::<u64>(),
        point in (-5.0..5.0f64, -5.0..5.0f64, -5.0..5.0f64),
    ) {
        // alternate labels so both classes are present
        let labels: Vec<u8> = (0..rows.len())
            .map(|i| ((i as u64 + labels_seed) % 2) as u8)
            .collect();
        let model = GaussianNaiveBayes::fit(&rows, &labels, 1e-9).unwrap();

        let [p_safe, p_risky] = model.predict_proba(&[point.0, point.1, point.2]).unwrap();
        prop_assert!((0.0..=1.0).contains(&p_safe));
        prop_assert!((0.0..=1.0).contains(&p_risky));
        prop_assert!((p_safe + p_risky - 1.0).abs() < 1e-9);
    }

    #[test]
    fn probabilities_normalized_when_classes_are_constant(
        safe in (0.0..60.0f64, 0.0..100.0f64, 0.0..5.0f64),
        risky in (0.0..60.0f64, 0.0..100.0f64, 0.0..5.0f64),
        per_class in 1usize..20,
        blend in 0.0..1.0f64,
    ) {
        let safe = [safe.0, safe.1, safe.2];
        let risky = [risky.0, risky.1, risky.2];
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for _ in 0..per_class {
            rows.push(safe.to_vec());
            labels.push(0);
            rows.push(risky.to_vec());
            labels.push(1);
        }
        // every class-conditional variance sits at the smoothing floor
        let model = GaussianNaiveBayes::fit(&rows, &labels, 1e-9).unwrap();

        let point: Vec<f64> = safe
            .iter()
            .zip(&risky)
            .map(|(s, r)| s + blend * (r - s))
            .collect();
        let [p_safe, p_risky] = model.predict_proba(&point).unwrap();
        prop_assert!((0.0..=1.0).contains(&p_safe));
        prop_assert!((0.0..=1.0).contains(&p_risky));
        prop_assert!((p_safe + p_risky - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perturbation_only_relabels_low_delay_positives(
        delays in prop::collection::vec(0.0..10.0f64, 1..100),
        seed in any::<u64>(),
    ) {
        let mut records: Vec<LabeledSupplierRecord> = delays
            .iter()
            .enumerate()
            .map(|(i, &d)| LabeledSupplierRecord::new(SupplierRecord::new(d, 80.0, 1.0), (i % 2) as u8))
            .collect();
        let original = records.clone();

        let summary = perturb(&mut records, 0.5, 2.0, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert_eq!(summary.rows, records.len());

        for (before, after) in original.iter().zip(&records) {
            prop_assert!(after.record.delay_days >= 0.0);
            prop_assert_eq!(after.record.reliability_score, before.record.reliability_score);
            prop_assert!(after.supply_risk_flag <= 1);
            if before.supply_risk_flag == 0 || after.record.delay_days >= 2.0 {
                prop_assert_eq!(after.supply_risk_flag, before.supply_risk_flag);
            }
        }
    }
}
