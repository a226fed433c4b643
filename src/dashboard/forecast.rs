//! Linear-trend forecast of a supplier metric

use crate::dashboard::generator::{PerformanceMetric, PerformanceRecord};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// z-score of the two-sided 95% band
const CONFIDENCE_Z: f64 = 1.96;

/// One forecast day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub forecast: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

/// Fitted trend plus the projected points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub supplier: String,
    pub metric: PerformanceMetric,
    pub intercept: f64,
    pub slope: f64,
    /// Sample standard deviation of the in-sample residuals
    pub residual_std: f64,
    pub points: Vec<ForecastPoint>,
}

/// Ordinary least squares fit of `y` on `x`, returning `(intercept, slope)`
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let sxx: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();

    let slope = sxy / sxx;
    Some((mean_y - slope * mean_x, slope))
}

/// Forecast `metric` for `supplier` over the next `horizon_days`.
///
/// The supplier's records are ordered by date and indexed 0..n; the band is
/// ±1.96 residual standard deviations. Fewer than two records yields `None`.
pub fn forecast(
    records: &[PerformanceRecord],
    supplier: &str,
    metric: PerformanceMetric,
    horizon_days: u32,
) -> Option<Forecast> {
    let mut history: Vec<&PerformanceRecord> =
        records.iter().filter(|r| r.supplier == supplier).collect();
    history.sort_by_key(|r| r.date);
    let last_date = history.last()?.date;

    let x: Vec<f64> = (0..history.len()).map(|i| i as f64).collect();
    let y: Vec<f64> = history.iter().map(|r| metric.value(r)).collect();
    let (intercept, slope) = fit_line(&x, &y)?;

    let residuals: Vec<f64> = x
        .iter()
        .zip(&y)
        .map(|(xi, yi)| yi - (intercept + slope * xi))
        .collect();
    let residual_std = sample_std(&residuals);
    let margin = CONFIDENCE_Z * residual_std;

    let points = (0..horizon_days)
        .map(|step| {
            let index = (history.len() + step as usize) as f64;
            let forecast = intercept + slope * index;
            ForecastPoint {
                date: last_date + Duration::days(i64::from(step) + 1),
                forecast,
                upper_bound: forecast + margin,
                lower_bound: forecast - margin,
            }
        })
        .collect();

    Some(Forecast {
        supplier: supplier.to_string(),
        metric,
        intercept,
        slope,
        residual_std,
        points,
    })
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
