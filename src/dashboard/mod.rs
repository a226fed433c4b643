//! Supplier performance dashboard analytics

pub mod alerts;
pub mod analytics;
pub mod forecast;
pub mod generator;

pub use alerts::{detect_alerts, AlertReason, PerformanceAlert};
pub use analytics::{
    quality_shares, supplier_summaries, PerformanceFilter, PerformanceOverview, QualityShare,
    SupplierSummary,
};
pub use forecast::{forecast, Forecast, ForecastPoint};
pub use generator::{generate_performance, supplier_names, PerformanceMetric, PerformanceRecord};

use crate::config::DashboardConfig;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

/// Everything the dashboard shows for one generated data set
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub records: Vec<PerformanceRecord>,
    pub overview: Option<PerformanceOverview>,
    pub summaries: Vec<SupplierSummary>,
    pub quality_shares: Vec<QualityShare>,
    pub alerts: Vec<PerformanceAlert>,
    /// On-time delivery forecast per supplier
    pub forecasts: Vec<Forecast>,
}

impl DashboardSnapshot {
    /// Generate the seeded data set starting at `start_date` and derive every view
    pub fn build(config: &DashboardConfig, start_date: NaiveDate) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let records = generate_performance(config, start_date, &mut rng);
        Self::from_records(config, records)
    }

    pub fn from_records(config: &DashboardConfig, records: Vec<PerformanceRecord>) -> Self {
        let summaries = supplier_summaries(&records);
        let forecasts = summaries
            .iter()
            .filter_map(|s| {
                forecast(
                    &records,
                    &s.supplier,
                    PerformanceMetric::OnTimeDelivery,
                    config.forecast_horizon_days,
                )
            })
            .collect();

        Self {
            overview: PerformanceOverview::from_records(&records),
            quality_shares: quality_shares(&summaries),
            alerts: detect_alerts(&records, &config.alerts),
            summaries,
            forecasts,
            records,
        }
    }

    pub fn log_summary(&self) {
        if let Some(overview) = &self.overview {
            info!(
                records = overview.records,
                on_time_delivery = format!("{:.1}", overview.avg_on_time_delivery),
                quality_score = format!("{:.1}", overview.avg_quality_score),
                order_accuracy = format!("{:.1}", overview.avg_order_accuracy),
                "Supplier performance overview"
            );
        }

        for share in &self.quality_shares {
            info!(
                supplier = %share.supplier,
                quality_score = share.quality_score,
                share_percent = format!("{:.1}", share.share_percent),
                "Quality share"
            );
        }

        for fc in &self.forecasts {
            if let Some(last) = fc.points.last() {
                info!(
                    supplier = %fc.supplier,
                    metric = fc.metric.label(),
                    slope = format!("{:.3}", fc.slope),
                    horizon_end = %last.date,
                    forecast = format!("{:.1}", last.forecast),
                    band = format!("[{:.1}, {:.1}]", last.lower_bound, last.upper_bound),
                    "Performance forecast"
                );
            }
        }

        if self.alerts.is_empty() {
            info!("No supplier performance alerts");
        } else {
            warn!(alerts = self.alerts.len(), "Supplier performance alerts raised");
            for alert in &self.alerts {
                warn!(
                    supplier = %alert.supplier,
                    date = %alert.date,
                    reasons = ?alert.reasons,
                    "Performance alert"
                );
            }
        }
    }
}
