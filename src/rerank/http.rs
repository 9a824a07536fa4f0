use super::RerankScorer;
use crate::error::{RagBenchError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request structure for the inference service /rerank endpoint
#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    candidates: &'a [String],
}

/// Response structure from the inference service /rerank endpoint
#[derive(Deserialize)]
struct RerankResponse {
    scores: Vec<f32>,
}

/// Cross-encoder client for one model id against the HTTP inference service.
///
/// Same failure policy as the embedder: timeout, no retries.
pub struct HttpReranker {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl HttpReranker {
    /// Create a reranker client for `model`.
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        model: &str,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagBenchError::Rerank(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
        })
    }

    /// The model id this client is bound to
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl RerankScorer for HttpReranker {
    async fn score_pairs(&self, query: &str, candidates: &[String]) -> Result<Vec<f32>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let request = RerankRequest {
            model: &self.model,
            query,
            candidates,
        };

        let mut builder = self
            .client
            .post(format!("{}/rerank", self.endpoint))
            .json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RagBenchError::Rerank(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(RagBenchError::Rerank(format!(
                "Inference service error {}: {}",
                status, body
            )));
        }

        let result: RerankResponse = response
            .json()
            .await
            .map_err(|e| RagBenchError::Rerank(format!("Failed to parse response: {}", e)))?;

        if result.scores.len() != candidates.len() {
            return Err(RagBenchError::Rerank(format!(
                "Expected {} scores, got {}",
                candidates.len(),
                result.scores.len()
            )));
        }

        Ok(result.scores)
    }
}
