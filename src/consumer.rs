//! NATS subscriber for incoming evaluation requests

use crate::config::NatsConfig;
use anyhow::{Context, Result};
use async_nats::{Client, Subscriber};
use tracing::info;

/// Consumer for evaluation requests.
///
/// With a queue group configured, every running service instance joins the
/// group and NATS hands each request to exactly one of them.
pub struct EvaluationConsumer {
    client: Client,
    subject: String,
    queue_group: Option<String>,
}

impl EvaluationConsumer {
    pub fn new(client: Client, config: &NatsConfig) -> Self {
        Self {
            client,
            subject: config.evaluation_subject.clone(),
            queue_group: config.queue_group.clone(),
        }
    }

    /// Subscribe to the evaluation subject, joining the queue group if any
    pub async fn subscribe(&self) -> Result<Subscriber> {
        let subscriber = match &self.queue_group {
            Some(group) => self
                .client
                .queue_subscribe(self.subject.clone(), group.clone())
                .await
                .with_context(|| {
                    format!("Failed to join queue group {group} on {}", self.subject)
                })?,
            None => self
                .client
                .subscribe(self.subject.clone())
                .await
                .with_context(|| format!("Failed to subscribe to {}", self.subject))?,
        };

        info!(
            subject = %self.subject,
            queue_group = self.queue_group.as_deref().unwrap_or("-"),
            "Subscribed to evaluation subject"
        );
        Ok(subscriber)
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn queue_group(&self) -> Option<&str> {
        self.queue_group.as_deref()
    }
}
