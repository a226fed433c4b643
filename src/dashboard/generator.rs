//! Synthetic supplier performance data

use crate::config::DashboardConfig;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Daily performance of one supplier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub supplier: String,
    pub date: NaiveDate,
    /// On-time delivery rate (%)
    pub on_time_delivery: f64,
    /// Quality score (%)
    pub quality_score: f64,
    /// Order accuracy (%)
    pub order_accuracy: f64,
    pub compliant: bool,
}

/// Performance metrics that can be charted or forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMetric {
    OnTimeDelivery,
    QualityScore,
    OrderAccuracy,
}

impl PerformanceMetric {
    pub fn value(self, record: &PerformanceRecord) -> f64 {
        match self {
            PerformanceMetric::OnTimeDelivery => record.on_time_delivery,
            PerformanceMetric::QualityScore => record.quality_score,
            PerformanceMetric::OrderAccuracy => record.order_accuracy,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceMetric::OnTimeDelivery => "On-Time Delivery",
            PerformanceMetric::QualityScore => "Quality Score",
            PerformanceMetric::OrderAccuracy => "Order Accuracy",
        }
    }
}

/// Supplier names `<prefix>1 ..= <prefix>n`
pub fn supplier_names(config: &DashboardConfig) -> Vec<String> {
    (1..=config.num_suppliers)
        .map(|i| format!("{}{}", config.supplier_prefix, i))
        .collect()
}

/// One record per supplier per day, supplier-major, for `num_days`
/// consecutive days starting at `start_date`
pub fn generate_performance<R: Rng + ?Sized>(
    config: &DashboardConfig,
    start_date: NaiveDate,
    rng: &mut R,
) -> Vec<PerformanceRecord> {
    let suppliers = supplier_names(config);
    let mut records = Vec::with_capacity(suppliers.len() * config.num_days as usize);

    for supplier in &suppliers {
        for day in 0..config.num_days {
            records.push(PerformanceRecord {
                supplier: supplier.clone(),
                date: start_date + Duration::days(i64::from(day)),
                on_time_delivery: rng.gen_range(config.on_time.min..=config.on_time.max),
                quality_score: rng.gen_range(config.quality.min..=config.quality.max),
                order_accuracy: rng.gen_range(config.accuracy.min..=config.accuracy.max),
                compliant: rng.gen_bool(config.compliance_probability),
            });
        }
    }

    records
}
