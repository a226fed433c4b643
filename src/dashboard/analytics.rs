//! Filters and aggregates over supplier performance records

use crate::dashboard::generator::{PerformanceMetric, PerformanceRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Supplier and date-range selection
#[derive(Debug, Clone, Default)]
pub struct PerformanceFilter {
    /// Selected suppliers; `None` keeps all
    pub suppliers: Option<HashSet<String>>,
    /// Inclusive lower date bound
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub to: Option<NaiveDate>,
}

impl PerformanceFilter {
    pub fn matches(&self, record: &PerformanceRecord) -> bool {
        self.suppliers
            .as_ref()
            .map_or(true, |selected| selected.contains(&record.supplier))
            && self.from.map_or(true, |from| record.date >= from)
            && self.to.map_or(true, |to| record.date <= to)
    }

    pub fn apply(&self, records: &[PerformanceRecord]) -> Vec<PerformanceRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Average of each metric over a selection (the KPI tiles)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceOverview {
    pub avg_on_time_delivery: f64,
    pub avg_quality_score: f64,
    pub avg_order_accuracy: f64,
    pub records: usize,
}

impl PerformanceOverview {
    /// `None` for an empty selection
    pub fn from_records(records: &[PerformanceRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let n = records.len() as f64;
        let avg = |metric: PerformanceMetric| records.iter().map(|r| metric.value(r)).sum::<f64>() / n;

        Some(Self {
            avg_on_time_delivery: avg(PerformanceMetric::OnTimeDelivery),
            avg_quality_score: avg(PerformanceMetric::QualityScore),
            avg_order_accuracy: avg(PerformanceMetric::OrderAccuracy),
            records: records.len(),
        })
    }
}

/// Per-supplier metric means
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierSummary {
    pub supplier: String,
    pub on_time_delivery: f64,
    pub quality_score: f64,
    pub order_accuracy: f64,
    pub days: usize,
}

/// Mean of each metric per supplier, in first-seen order
pub fn supplier_summaries(records: &[PerformanceRecord]) -> Vec<SupplierSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, ([f64; 3], usize)> = HashMap::new();

    for record in records {
        let entry = sums.entry(record.supplier.as_str()).or_insert_with(|| {
            order.push(record.supplier.as_str());
            ([0.0; 3], 0)
        });
        entry.0[0] += record.on_time_delivery;
        entry.0[1] += record.quality_score;
        entry.0[2] += record.order_accuracy;
        entry.1 += 1;
    }

    order
        .into_iter()
        .filter_map(|supplier| {
            let (totals, days) = sums.get(supplier)?;
            let n = *days as f64;
            Some(SupplierSummary {
                supplier: supplier.to_string(),
                on_time_delivery: totals[0] / n,
                quality_score: totals[1] / n,
                order_accuracy: totals[2] / n,
                days: *days,
            })
        })
        .collect()
}

/// A supplier's contribution to the overall quality picture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityShare {
    pub supplier: String,
    /// Mean quality score, rounded to 2 decimals
    pub quality_score: f64,
    /// Percentage of the summed mean quality scores
    pub share_percent: f64,
}

pub fn quality_shares(summaries: &[SupplierSummary]) -> Vec<QualityShare> {
    let rounded: Vec<f64> = summaries
        .iter()
        .map(|s| (s.quality_score * 100.0).round() / 100.0)
        .collect();
    let total: f64 = rounded.iter().sum();

    summaries
        .iter()
        .zip(rounded)
        .map(|(summary, quality_score)| QualityShare {
            supplier: summary.supplier.clone(),
            quality_score,
            share_percent: if total > 0.0 {
                quality_score / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
