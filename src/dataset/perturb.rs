//! Label-noise perturbation applied to freshly loaded training data.
//!
//! Gaussian noise on `delay_days` plus random re-drawing of positive labels
//! with short delays keeps the delay feature from separating the classes
//! perfectly.

use crate::error::{Result, RiskError};
use crate::types::supplier::LabeledSupplierRecord;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Counts describing what the perturbation changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerturbationSummary {
    /// Rows processed
    pub rows: usize,
    /// Positive rows whose noisy delay fell below the relabel threshold
    pub relabel_candidates: usize,
    /// Candidates whose flag was re-drawn as 0
    pub flags_cleared: usize,
}

/// Add `N(0, noise_std_dev)` to every delay (clamped at zero), then re-draw
/// the flag uniformly from {0, 1} for positive rows with delay below
/// `relabel_delay_below`.
pub fn perturb<R: Rng + ?Sized>(
    records: &mut [LabeledSupplierRecord],
    noise_std_dev: f64,
    relabel_delay_below: f64,
    rng: &mut R,
) -> Result<PerturbationSummary> {
    let noise = Normal::new(0.0, noise_std_dev)
        .map_err(|e| RiskError::invalid_config(format!("noise distribution: {e}")))?;

    for row in records.iter_mut() {
        let noisy = row.record.delay_days + noise.sample(rng);
        row.record.delay_days = noisy.max(0.0);
    }

    let mut summary = PerturbationSummary {
        rows: records.len(),
        ..Default::default()
    };

    for row in records
        .iter_mut()
        .filter(|row| row.is_risky() && row.record.delay_days < relabel_delay_below)
    {
        summary.relabel_candidates += 1;
        row.supply_risk_flag = rng.gen_range(0..=1u8);
        if row.supply_risk_flag == 0 {
            summary.flags_cleared += 1;
        }
    }

    Ok(summary)
}
