//! Configuration management for the supplier risk pipeline

use crate::error::{Result as RiskResult, RiskError};
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub request_limits: RequestLimits,
    pub dashboard: DashboardConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject for incoming evaluation requests
    pub evaluation_subject: String,
    /// Subject for assessments when the request has no reply subject
    pub result_subject: String,
    /// Queue group shared by service instances; each request goes to one member
    #[serde(default)]
    pub queue_group: Option<String>,
}

/// Training dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Path to the labeled CSV table
    pub path: String,
    /// Standard deviation of the Gaussian noise added to delay days
    #[serde(default = "default_noise_std_dev")]
    pub noise_std_dev: f64,
    /// Positive labels with noisy delay below this value are re-drawn
    #[serde(default = "default_relabel_delay_below")]
    pub relabel_delay_below: f64,
    /// Seed for noise injection and label correction
    pub perturbation_seed: u64,
    /// Fraction of rows held out for evaluation
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    /// Seed for the train/test shuffle
    pub split_seed: u64,
}

fn default_noise_std_dev() -> f64 {
    0.5
}

fn default_relabel_delay_below() -> f64 {
    2.0
}

fn default_test_fraction() -> f64 {
    0.2
}

/// Classifier hyperparameters
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Fraction of the largest feature variance added to every variance
    #[serde(default = "default_var_smoothing")]
    pub var_smoothing: f64,
}

fn default_var_smoothing() -> f64 {
    1e-9
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            var_smoothing: default_var_smoothing(),
        }
    }
}

/// Input limits enforced on evaluation requests (the dashboard form bounds)
#[derive(Debug, Clone, Deserialize)]
pub struct RequestLimits {
    /// Largest accepted delay in days
    pub max_delay_days: f64,
    /// Upper bound of percentage-scale fields
    pub max_percentage: f64,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_delay_days: 60.0,
            max_percentage: 100.0,
        }
    }
}

/// Inclusive range a synthetic metric is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> RiskResult<()> {
        if !(0.0..=100.0).contains(&self.min) || !(0.0..=100.0).contains(&self.max) {
            return Err(RiskError::invalid_config(format!(
                "dashboard.{name} must lie within [0, 100], got {}..{}",
                self.min, self.max
            )));
        }
        if self.min > self.max {
            return Err(RiskError::invalid_config(format!(
                "dashboard.{name} min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Synthetic dashboard data configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub num_suppliers: usize,
    pub supplier_prefix: String,
    pub num_days: u32,
    /// Seed for synthetic performance data
    pub seed: u64,
    pub on_time: ScoreRange,
    pub quality: ScoreRange,
    pub accuracy: ScoreRange,
    /// Probability a generated record is compliant
    pub compliance_probability: f64,
    pub forecast_horizon_days: u32,
    #[serde(default)]
    pub alerts: AlertThresholds,
}

/// Thresholds below which a performance record raises an alert
#[derive(Debug, Clone, Deserialize)]
pub struct AlertThresholds {
    pub min_on_time_delivery: f64,
    pub min_quality_score: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            min_on_time_delivery: 85.0,
            min_quality_score: 80.0,
        }
    }
}

/// Service loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Maximum concurrently processed requests
    pub workers: usize,
    /// Interval between metrics summaries
    #[serde(default = "default_metrics_interval")]
    pub metrics_interval_secs: u64,
}

fn default_metrics_interval() -> u64 {
    30
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load and validate configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: AppConfig = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate().context("Configuration failed validation")?;
        Ok(config)
    }

    /// Check every option against its valid range
    pub fn validate(&self) -> RiskResult<()> {
        for (name, value) in [
            ("nats.url", &self.nats.url),
            ("nats.evaluation_subject", &self.nats.evaluation_subject),
            ("nats.result_subject", &self.nats.result_subject),
            ("dataset.path", &self.dataset.path),
        ] {
            if value.trim().is_empty() {
                return Err(RiskError::invalid_config(format!("{name} must not be empty")));
            }
        }
        if matches!(&self.nats.queue_group, Some(group) if group.trim().is_empty()) {
            return Err(RiskError::invalid_config(
                "nats.queue_group must not be empty when set",
            ));
        }

        let dataset = &self.dataset;
        if !dataset.noise_std_dev.is_finite() || dataset.noise_std_dev < 0.0 {
            return Err(RiskError::invalid_config(format!(
                "dataset.noise_std_dev must be finite and non-negative, got {}",
                dataset.noise_std_dev
            )));
        }
        if !dataset.relabel_delay_below.is_finite() || dataset.relabel_delay_below < 0.0 {
            return Err(RiskError::invalid_config(format!(
                "dataset.relabel_delay_below must be finite and non-negative, got {}",
                dataset.relabel_delay_below
            )));
        }
        if !(dataset.test_fraction > 0.0 && dataset.test_fraction < 1.0) {
            return Err(RiskError::invalid_config(format!(
                "dataset.test_fraction must lie in (0, 1), got {}",
                dataset.test_fraction
            )));
        }

        let smoothing = self.classifier.var_smoothing;
        if !smoothing.is_finite() || smoothing <= 0.0 {
            return Err(RiskError::invalid_config(format!(
                "classifier.var_smoothing must be positive, got {smoothing}"
            )));
        }

        let limits = &self.request_limits;
        if !(limits.max_delay_days.is_finite() && limits.max_delay_days > 0.0)
            || !(limits.max_percentage.is_finite() && limits.max_percentage > 0.0)
        {
            return Err(RiskError::invalid_config(
                "request_limits must be finite and positive",
            ));
        }

        let dashboard = &self.dashboard;
        if !(1..=1000).contains(&dashboard.num_suppliers) {
            return Err(RiskError::invalid_config(format!(
                "dashboard.num_suppliers must lie in 1..=1000, got {}",
                dashboard.num_suppliers
            )));
        }
        if !(7..=90).contains(&dashboard.num_days) {
            return Err(RiskError::invalid_config(format!(
                "dashboard.num_days must lie in 7..=90, got {}",
                dashboard.num_days
            )));
        }
        dashboard.on_time.validate("on_time")?;
        dashboard.quality.validate("quality")?;
        dashboard.accuracy.validate("accuracy")?;
        if !(0.0..=1.0).contains(&dashboard.compliance_probability) {
            return Err(RiskError::invalid_config(format!(
                "dashboard.compliance_probability must lie in [0, 1], got {}",
                dashboard.compliance_probability
            )));
        }
        if !(7..=60).contains(&dashboard.forecast_horizon_days) {
            return Err(RiskError::invalid_config(format!(
                "dashboard.forecast_horizon_days must lie in 7..=60, got {}",
                dashboard.forecast_horizon_days
            )));
        }
        let alerts = &dashboard.alerts;
        if !(0.0..=100.0).contains(&alerts.min_on_time_delivery)
            || !(0.0..=100.0).contains(&alerts.min_quality_score)
        {
            return Err(RiskError::invalid_config(
                "dashboard.alerts thresholds must lie within [0, 100]",
            ));
        }

        if self.pipeline.workers == 0 {
            return Err(RiskError::invalid_config("pipeline.workers must be at least 1"));
        }
        if self.pipeline.metrics_interval_secs == 0 {
            return Err(RiskError::invalid_config(
                "pipeline.metrics_interval_secs must be at least 1",
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(RiskError::invalid_config(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                evaluation_subject: "supplier.evaluations".to_string(),
                result_subject: "supplier.assessments".to_string(),
                queue_group: None,
            },
            dataset: DatasetConfig {
                path: "data/data.csv".to_string(),
                noise_std_dev: default_noise_std_dev(),
                relabel_delay_below: default_relabel_delay_below(),
                perturbation_seed: 7,
                test_fraction: default_test_fraction(),
                split_seed: 42,
            },
            classifier: ClassifierConfig::default(),
            request_limits: RequestLimits::default(),
            dashboard: DashboardConfig {
                num_suppliers: 5,
                supplier_prefix: "Supplier_".to_string(),
                num_days: 30,
                seed: 42,
                on_time: ScoreRange::new(80.0, 100.0),
                quality: ScoreRange::new(70.0, 100.0),
                accuracy: ScoreRange::new(75.0, 100.0),
                compliance_probability: 0.95,
                forecast_horizon_days: 14,
                alerts: AlertThresholds::default(),
            },
            pipeline: PipelineConfig {
                workers: 4,
                metrics_interval_secs: default_metrics_interval(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}
