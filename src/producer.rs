//! NATS publisher for evaluation responses

use crate::types::verdict::EvaluationResponse;
use anyhow::{Context, Result};
use async_nats::{Client, Subject};
use tracing::debug;

/// Publishes assessments and rejections back to callers
#[derive(Clone)]
pub struct AssessmentProducer {
    client: Client,
    result_subject: String,
}

impl AssessmentProducer {
    pub fn new(client: Client, result_subject: &str) -> Self {
        Self {
            client,
            result_subject: result_subject.to_string(),
        }
    }

    /// Subject a response goes to: the request's reply inbox, else the result subject
    pub fn target_subject(&self, reply: Option<&Subject>) -> String {
        reply
            .map(|subject| subject.to_string())
            .unwrap_or_else(|| self.result_subject.clone())
    }

    /// Publish one response
    pub async fn publish(&self, reply: Option<&Subject>, response: &EvaluationResponse) -> Result<()> {
        let payload = serde_json::to_vec(response).context("Failed to serialize response")?;
        let subject = self.target_subject(reply);

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .with_context(|| format!("Failed to publish to {subject}"))?;

        debug!(
            request_id = %response.request_id(),
            subject = %subject,
            "Published evaluation response"
        );

        Ok(())
    }

    pub fn result_subject(&self) -> &str {
        &self.result_subject
    }
}
