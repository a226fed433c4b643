//! Evaluation Request Generator
//!
//! Publishes random supplier evaluation requests to NATS for exercising the
//! risk service, and prints the assessments that come back.

use futures::StreamExt;
use rand::Rng;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Kind of request to send
#[derive(Debug, Clone, Copy)]
enum RequestKind {
    Reliable,
    Risky,
    Malformed,
}

/// Random request generator
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    fn next_kind(&mut self, risky_rate: f64, malformed_rate: f64) -> RequestKind {
        let roll: f64 = self.rng.gen();
        if roll < malformed_rate {
            RequestKind::Malformed
        } else if roll < malformed_rate + risky_rate {
            RequestKind::Risky
        } else {
            RequestKind::Reliable
        }
    }

    fn generate(&mut self, kind: RequestKind) -> Value {
        self.request_counter += 1;
        let request_id = format!("req_{:010}", self.request_counter);
        let supplier_id = format!("SUP{:03}", self.rng.gen_range(1..200));
        let order_id = format!("ORD{:05}", self.rng.gen_range(1..100_000));

        match kind {
            // Long lead time, high reliability, small parameter changes
            RequestKind::Reliable => json!({
                "request_id": request_id,
                "supplier_id": supplier_id,
                "order_id": order_id,
                "delay_days": self.rng.gen_range(30.0..60.0),
                "reliability_score": self.rng.gen_range(85.0..100.0),
                "parameter_change_magnitude": self.rng.gen_range(0.5..1.5),
            }),
            RequestKind::Risky => json!({
                "request_id": request_id,
                "supplier_id": supplier_id,
                "order_id": order_id,
                "delay_days": self.rng.gen_range(0.0..15.0),
                "reliability_score": self.rng.gen_range(30.0..65.0),
                "parameter_change_magnitude": self.rng.gen_range(2.0..4.0),
            }),
            // No parameter_change_magnitude
            RequestKind::Malformed => json!({
                "request_id": request_id,
                "supplier_id": supplier_id,
                "delay_days": self.rng.gen_range(0.0..60.0),
                "reliability_score": self.rng.gen_range(0.0..100.0),
            }),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("evaluation_requester=info".parse()?),
        )
        .init();

    info!("Starting Evaluation Request Generator");

    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("supplier.evaluations");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(20);
    let risky_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.3);
    let malformed_rate: f64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(6).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        risky_rate = risky_rate,
        malformed_rate = malformed_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, risky_rate, malformed_rate, delay_ms).await;
        }
    };

    let mut generator = RequestGenerator::new();
    let mut low = 0u64;
    let mut high = 0u64;
    let mut rejected = 0u64;

    for i in 0..count {
        let kind = generator.next_kind(risky_rate, malformed_rate);
        let payload = serde_json::to_vec(&generator.generate(kind))?;

        // Request-reply through a private inbox so the answer comes straight back
        let inbox = client.new_inbox();
        let mut replies = client.subscribe(inbox.clone()).await?;
        client
            .publish_with_reply(subject.to_string(), inbox, payload.into())
            .await?;

        match tokio::time::timeout(Duration::from_secs(5), replies.next()).await {
            Ok(Some(reply)) => {
                let response: Value = serde_json::from_slice(&reply.payload)?;
                match response["status"].as_str() {
                    Some("assessed") => {
                        if response["risk_class"] == "high" {
                            high += 1;
                        } else {
                            low += 1;
                        }
                        info!(
                            request = i + 1,
                            kind = ?kind,
                            risk_level = %response["verdict"]["risk_level"],
                            probability_risky = %response["probability_risky"],
                            "Assessment received"
                        );
                    }
                    _ => {
                        rejected += 1;
                        info!(
                            request = i + 1,
                            kind = ?kind,
                            code = %response["code"],
                            reason = %response["reason"],
                            "Request rejected"
                        );
                    }
                }
            }
            Ok(None) => warn!(request = i + 1, "Reply subscription closed"),
            Err(_) => warn!(request = i + 1, "No reply within 5s"),
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Sent {} requests ({} low risk, {} high risk, {} rejected)",
        count, low, high, rejected
    );

    Ok(())
}

async fn run_dry_mode(
    count: u64,
    risky_rate: f64,
    malformed_rate: f64,
    delay_ms: u64,
) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();

    for i in 0..count {
        let kind = generator.next_kind(risky_rate, malformed_rate);
        let json = serde_json::to_string_pretty(&generator.generate(kind))?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample {:?} request {}:\n{}", kind, i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
