//! Supplier Risk Pipeline - Main Entry Point
//!
//! Trains the supplier-risk classifier at startup, logs the performance
//! dashboard, then answers evaluation requests from NATS in parallel.

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Utc};
use futures::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use supplier_risk_pipeline::{
    config::{AppConfig, LoggingConfig},
    consumer::EvaluationConsumer,
    dashboard::DashboardSnapshot,
    metrics::{MetricsReporter, ServiceMetrics},
    models::train_from_config,
    producer::AssessmentProducer,
    types::{EvaluationRequest, EvaluationResponse},
};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("supplier_risk_pipeline={}", logging.level).parse()?);

    if logging.format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting Supplier Risk Pipeline");
    info!(
        dataset = %config.dataset.path,
        noise_std_dev = config.dataset.noise_std_dev,
        test_fraction = config.dataset.test_fraction,
        "Configuration loaded successfully"
    );

    // Train once; the fitted model is read-only from here on
    let outcome = train_from_config(&config).context("Model training failed")?;
    outcome.report.log_summary();
    let model = Arc::new(outcome.model);
    info!(
        features = model.extractor().feature_count(),
        train_rows = outcome.train_rows,
        test_rows = outcome.test_rows,
        "Supplier risk model ready"
    );

    let start_date =
        Utc::now().date_naive() - ChronoDuration::days(i64::from(config.dashboard.num_days));
    DashboardSnapshot::build(&config.dashboard, start_date).log_summary();

    let metrics = Arc::new(ServiceMetrics::new());

    let client = async_nats::connect(&config.nats.url)
        .await
        .with_context(|| format!("Failed to connect to NATS at {}", config.nats.url))?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = EvaluationConsumer::new(client.clone(), &config.nats);
    let producer = Arc::new(AssessmentProducer::new(client, &config.nats.result_subject));

    let num_workers = config.pipeline.workers;
    info!(
        workers = num_workers,
        subject = %consumer.subject(),
        queue_group = consumer.queue_group().unwrap_or("-"),
        result_subject = %producer.result_subject(),
        "Starting evaluation loop"
    );

    let semaphore = Arc::new(Semaphore::new(num_workers));
    let handled_count = Arc::new(AtomicU64::new(0));

    let reporter = MetricsReporter::new(metrics.clone(), config.pipeline.metrics_interval_secs);
    tokio::spawn(reporter.start());

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("Worker semaphore closed")?;

        let model = model.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let handled_count = handled_count.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            let response = match serde_json::from_slice::<EvaluationRequest>(&message.payload) {
                Ok(request) => match model.respond(&request) {
                    Ok(response) => Some(response),
                    Err(e) => {
                        error!(
                            request_id = %request.request_id,
                            error = %e,
                            "Inference failed"
                        );
                        None
                    }
                },
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize evaluation request");
                    Some(EvaluationResponse::rejected(
                        "unknown",
                        "malformed_request",
                        e.to_string(),
                    ))
                }
            };

            if let Some(response) = response {
                let processing_time = start_time.elapsed();

                match &response {
                    EvaluationResponse::Assessed(assessment) => {
                        metrics.record_assessment(processing_time, assessment);
                        debug!(
                            request_id = %assessment.request_id,
                            risk_level = %assessment.verdict.risk_level,
                            probability_risky = assessment.probability_risky,
                            processing_time_us = processing_time.as_micros(),
                            "Supplier assessed"
                        );
                    }
                    EvaluationResponse::Rejected {
                        request_id,
                        code,
                        reason,
                    } => {
                        metrics.record_rejection(processing_time, code);
                        warn!(
                            request_id = %request_id,
                            code = %code,
                            reason = %reason,
                            "Evaluation request rejected"
                        );
                    }
                }

                if let Err(e) = producer.publish(message.reply.as_ref(), &response).await {
                    error!(
                        request_id = %response.request_id(),
                        error = %e,
                        "Failed to publish evaluation response"
                    );
                }
            }

            let count = handled_count.fetch_add(1, Ordering::Relaxed) + 1;
            if count % 100 == 0 {
                let processing_stats = metrics.get_processing_stats();
                info!(
                    handled = count,
                    throughput = format!("{:.1} req/s", metrics.get_throughput()),
                    avg_latency_us = processing_stats.mean_us,
                    "Processing milestone"
                );
            }

            drop(permit);
        });
    }

    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
