//! Gaussian Naive Bayes classifier for the binary supply risk flag

use crate::error::{Result, RiskError};
use std::f64::consts::PI;
use tracing::warn;

/// Absolute variance floor used when every training feature is constant
const MIN_VARIANCE: f64 = 1e-12;

/// Prior and per-feature Gaussian parameters of one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStatistics {
    /// Training rows in this class
    pub count: usize,
    /// P(class)
    pub prior: f64,
    /// Per-feature mean
    pub means: Vec<f64>,
    /// Per-feature variance, smoothed
    pub variances: Vec<f64>,
}

/// A feature that was constant within one class during training
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegenerateFeature {
    pub class: u8,
    pub feature: usize,
}

/// Binary Gaussian Naive Bayes.
///
/// Built only by [`GaussianNaiveBayes::fit`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianNaiveBayes {
    classes: [ClassStatistics; 2],
    epsilon: f64,
    degenerate: Vec<DegenerateFeature>,
}

impl GaussianNaiveBayes {
    /// Estimate class priors and per-class feature means and variances.
    ///
    /// Every variance gets `var_smoothing * max feature variance` added.
    /// Both labels 0 and 1 must occur in `labels`.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], var_smoothing: f64) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(RiskError::feature_shape(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let width = match rows.first() {
            Some(row) => row.len(),
            None => return Err(RiskError::insufficient_data("cannot fit classifier on zero rows")),
        };
        if rows.iter().any(|row| row.len() != width) {
            return Err(RiskError::feature_shape("rows have differing feature counts"));
        }
        if let Some(label) = labels.iter().find(|&&label| label > 1) {
            return Err(RiskError::insufficient_data(format!(
                "labels must be 0 or 1, got {label}"
            )));
        }

        let max_variance = (0..width)
            .map(|feature| {
                let column: Vec<f64> = rows.iter().map(|row| row[feature]).collect();
                population_variance(&column)
            })
            .fold(0.0, f64::max);
        let epsilon = (var_smoothing * max_variance).max(MIN_VARIANCE);

        let total = rows.len() as f64;
        let mut degenerate = Vec::new();
        let mut fit_class = |class: u8| -> Result<ClassStatistics> {
            let members: Vec<&Vec<f64>> = rows
                .iter()
                .zip(labels)
                .filter(|(_, &label)| label == class)
                .map(|(row, _)| row)
                .collect();
            if members.is_empty() {
                return Err(RiskError::insufficient_data(format!(
                    "training labels contain no rows of class {class}"
                )));
            }

            let mut means = Vec::with_capacity(width);
            let mut variances = Vec::with_capacity(width);
            for feature in 0..width {
                let column: Vec<f64> = members.iter().map(|row| row[feature]).collect();
                let variance = population_variance(&column);
                if variance == 0.0 {
                    warn!(class, feature, "Feature is constant within class, flooring variance");
                    degenerate.push(DegenerateFeature { class, feature });
                }
                means.push(mean(&column));
                variances.push(variance + epsilon);
            }

            Ok(ClassStatistics {
                count: members.len(),
                prior: members.len() as f64 / total,
                means,
                variances,
            })
        };

        let negative = fit_class(0)?;
        let positive = fit_class(1)?;

        Ok(Self {
            classes: [negative, positive],
            epsilon,
            degenerate,
        })
    }

    /// Unnormalized log posterior `ln P(c) + Σ ln N(x_i; μ_ci, σ²_ci)` per class
    pub fn joint_log_likelihood(&self, features: &[f64]) -> Result<[f64; 2]> {
        let width = self.feature_count();
        if features.len() != width {
            return Err(RiskError::feature_shape(format!(
                "expected {width} features, got {}",
                features.len()
            )));
        }

        let mut scores = [0.0; 2];
        for (score, class) in scores.iter_mut().zip(&self.classes) {
            let log_likelihood: f64 = features
                .iter()
                .zip(class.means.iter().zip(&class.variances))
                .map(|(x, (mu, var))| -0.5 * (2.0 * PI * var).ln() - (x - mu).powi(2) / (2.0 * var))
                .sum();
            *score = class.prior.ln() + log_likelihood;
        }
        Ok(scores)
    }

    /// Class with the highest posterior; ties go to class 0
    pub fn predict_class(&self, features: &[f64]) -> Result<u8> {
        let [negative, positive] = self.joint_log_likelihood(features)?;
        Ok(if positive > negative { 1 } else { 0 })
    }

    /// Normalized posterior `[P(0|x), P(1|x)]`.
    ///
    /// Computed as a logistic of the score difference; the smaller
    /// probability is evaluated directly and the larger is its complement.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2]> {
        let [negative, positive] = self.joint_log_likelihood(features)?;
        let margin = positive - negative;

        if margin > 0.0 {
            let p_safe = 1.0 / (1.0 + margin.exp());
            Ok([p_safe, 1.0 - p_safe])
        } else {
            let p_risky = 1.0 / (1.0 + (-margin).exp());
            Ok([1.0 - p_risky, p_risky])
        }
    }

    /// Predict every row of a matrix
    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>> {
        rows.iter().map(|row| self.predict_class(row)).collect()
    }

    pub fn class_statistics(&self, class: u8) -> &ClassStatistics {
        &self.classes[usize::from(class.min(1))]
    }

    pub fn feature_count(&self) -> usize {
        self.classes[0].means.len()
    }

    /// Variance added to every class-conditional variance
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Features whose within-class variance was zero before smoothing
    pub fn degenerate_features(&self) -> &[DegenerateFeature] {
        &self.degenerate
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64
}
