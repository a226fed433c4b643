//! Feature standardization

use crate::error::{Result, RiskError};
use crate::feature_extractor::FeatureVector;

/// Per-feature standardization fitted once on training data.
///
/// The only constructor is [`StandardScaler::fit`] and nothing mutates the
/// parameters afterwards, so the scaler used for inference is always the one
/// fitted on the training split.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    columns: Vec<String>,
    means: Vec<f64>,
    std_devs: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-column mean and population standard deviation.
    ///
    /// Columns with zero spread get a standard deviation of 1, so they
    /// transform to 0 instead of dividing by zero.
    pub fn fit<S: AsRef<str>>(columns: &[S], rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(RiskError::insufficient_data("cannot fit scaler on zero rows"));
        }
        let width = columns.len();
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(RiskError::feature_shape(format!(
                "row {index} has {} values, expected {width}",
                row.len()
            )));
        }

        let count = rows.len() as f64;
        let mut means = vec![0.0; width];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= count;
        }

        let mut std_devs = vec![0.0; width];
        for row in rows {
            for ((acc, value), mean) in std_devs.iter_mut().zip(row).zip(&means) {
                *acc += (value - mean).powi(2);
            }
        }
        for std_dev in &mut std_devs {
            *std_dev = (*std_dev / count).sqrt();
            if *std_dev == 0.0 {
                *std_dev = 1.0;
            }
        }

        Ok(Self {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            means,
            std_devs,
        })
    }

    /// Standardize one feature vector.
    ///
    /// Fails when its columns differ in count, name or order from the ones
    /// seen at fit time.
    pub fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        if features.columns() != self.columns.as_slice() {
            return Err(RiskError::feature_shape(format!(
                "expected columns {:?}, got {:?}",
                self.columns,
                features.columns()
            )));
        }
        self.transform_values(features.values())
    }

    /// Standardize raw values already in fitted column order.
    pub fn transform_values(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.len() != self.means.len() {
            return Err(RiskError::feature_shape(format!(
                "expected {} features, got {}",
                self.means.len(),
                values.len()
            )));
        }
        Ok(values
            .iter()
            .zip(self.means.iter().zip(&self.std_devs))
            .map(|(value, (mean, std_dev))| (value - mean) / std_dev)
            .collect())
    }

    /// Standardize a matrix of rows.
    pub fn transform_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform_values(row)).collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }
}
