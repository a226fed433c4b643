//! Throughput, latency and verdict statistics for the evaluation service.

use crate::types::verdict::SupplierAssessment;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

const LATENCY_HISTORY: usize = 10_000;

/// Metrics collector shared by every evaluation task
pub struct ServiceMetrics {
    /// Requests that produced an assessment
    pub assessments: AtomicU64,
    /// Requests answered with a rejection
    pub rejections: AtomicU64,
    /// Assessments by risk level label
    by_level: RwLock<HashMap<String, u64>>,
    /// Rejections by error code
    rejections_by_code: RwLock<HashMap<String, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Histogram of the risky-class probability
    probability_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            assessments: AtomicU64::new(0),
            rejections: AtomicU64::new(0),
            by_level: RwLock::new(HashMap::new()),
            rejections_by_code: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            probability_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a completed assessment
    pub fn record_assessment(&self, processing_time: Duration, assessment: &SupplierAssessment) {
        self.assessments.fetch_add(1, Ordering::Relaxed);
        self.record_latency(processing_time);

        if let Ok(mut by_level) = self.by_level.write() {
            *by_level
                .entry(assessment.verdict.risk_level.clone())
                .or_insert(0) += 1;
        }

        let bucket = (assessment.probability_risky.clamp(0.0, 1.0) * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.probability_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a request that was answered with a rejection
    pub fn record_rejection(&self, processing_time: Duration, code: &str) {
        self.rejections.fetch_add(1, Ordering::Relaxed);
        self.record_latency(processing_time);

        if let Ok(mut by_code) = self.rejections_by_code.write() {
            *by_code.entry(code.to_string()).or_insert(0) += 1;
        }
    }

    fn record_latency(&self, processing_time: Duration) {
        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            if times.len() > LATENCY_HISTORY {
                times.drain(0..LATENCY_HISTORY / 2);
            }
        }
    }

    pub fn get_processing_stats(&self) -> ProcessingStats {
        let sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return ProcessingStats::default(),
        };

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let at = |q: f64| sorted[((count as f64 * q) as usize).min(count - 1)];

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: at(0.5),
            p95_us: at(0.95),
            p99_us: at(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Requests handled per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.handled() as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn handled(&self) -> u64 {
        self.assessments.load(Ordering::Relaxed) + self.rejections.load(Ordering::Relaxed)
    }

    pub fn get_probability_distribution(&self) -> [u64; 10] {
        self.probability_buckets
            .read()
            .map(|b| *b)
            .unwrap_or_default()
    }

    pub fn get_assessments_by_level(&self) -> HashMap<String, u64> {
        self.by_level
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn get_rejections_by_code(&self) -> HashMap<String, u64> {
        self.rejections_by_code
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let assessed = self.assessments.load(Ordering::Relaxed);
        let rejected = self.rejections.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();
        let throughput = self.get_throughput();

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║          SUPPLIER RISK SERVICE - METRICS SUMMARY             ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Assessments: {:>8}  │  Rejections: {:>8}  │ {:>6.1} req/s ║",
            assessed, rejected, throughput
        );
        info!(
            "║ Processing Time (μs): mean={:>5} p50={:>5} p95={:>5} p99={:>5} ║",
            processing.mean_us, processing.p50_us, processing.p95_us, processing.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Assessments by Risk Level:                                   ║");
        for (level, count) in &self.get_assessments_by_level() {
            let pct = if assessed > 0 {
                (*count as f64 / assessed as f64) * 100.0
            } else {
                0.0
            };
            info!("║   {:10}: {:>6} ({:>5.1}%)", level, count, pct);
        }

        let by_code = self.get_rejections_by_code();
        if !by_code.is_empty() {
            info!("║ Rejections by Code:                                          ║");
            for (code, count) in &by_code {
                info!("║   {:14}: {:>6}", code, count);
            }
        }

        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Risky-Class Probability Distribution:                        ║");
        let dist = self.get_probability_distribution();
        let total: u64 = dist.iter().sum();
        for (i, &count) in dist.iter().enumerate() {
            let pct = if total > 0 { (count as f64 / total as f64) * 100.0 } else { 0.0 };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>6} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Logs a metrics summary on a fixed interval
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));
        // first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
