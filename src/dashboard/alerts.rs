//! Threshold-based supplier performance alerts

use crate::config::AlertThresholds;
use crate::dashboard::generator::PerformanceRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// Why a record raised an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertReason {
    LateDelivery,
    LowQuality,
    NonCompliant,
}

/// A performance record that crossed at least one threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceAlert {
    pub supplier: String,
    pub date: NaiveDate,
    pub on_time_delivery: f64,
    pub quality_score: f64,
    pub compliant: bool,
    pub reasons: Vec<AlertReason>,
}

/// Reasons a single record is alerting; empty when it is healthy
pub fn alert_reasons(record: &PerformanceRecord, thresholds: &AlertThresholds) -> Vec<AlertReason> {
    let mut reasons = Vec::new();
    if record.on_time_delivery < thresholds.min_on_time_delivery {
        reasons.push(AlertReason::LateDelivery);
    }
    if record.quality_score < thresholds.min_quality_score {
        reasons.push(AlertReason::LowQuality);
    }
    if !record.compliant {
        reasons.push(AlertReason::NonCompliant);
    }
    reasons
}

/// One alert per record with late delivery, low quality or non-compliance
pub fn detect_alerts(
    records: &[PerformanceRecord],
    thresholds: &AlertThresholds,
) -> Vec<PerformanceAlert> {
    records
        .iter()
        .filter_map(|record| {
            let reasons = alert_reasons(record, thresholds);
            if reasons.is_empty() {
                return None;
            }
            Some(PerformanceAlert {
                supplier: record.supplier.clone(),
                date: record.date,
                on_time_delivery: record.on_time_delivery,
                quality_score: record.quality_score,
                compliant: record.compliant,
                reasons,
            })
        })
        .collect()
}
