use super::Embedder;
use crate::error::{RagBenchError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request structure for the inference service /embed endpoint
#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

/// Response structure from the inference service /embed endpoint
#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Embedding client for one model id against the HTTP inference service.
///
/// Large inputs are split into API batches of `batch_size` texts. Calls carry
/// a client-level timeout and are not retried; a failed call fails the run.
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    batch_size: usize,
}

impl HttpEmbedder {
    /// Create an embedding client for `model`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL of the inference service
    /// * `api_key` - Optional bearer token
    /// * `model` - Embedding model identifier
    /// * `batch_size` - Maximum texts per API request
    /// * `timeout_secs` - Per-request timeout
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        model: &str,
        batch_size: usize,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagBenchError::Embedding(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            model: model.to_string(),
            batch_size: batch_size.max(1),
        })
    }

    /// The model id this client is bound to
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single API request for up to `batch_size` texts
    async fn embed_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        let mut builder = self
            .client
            .post(format!("{}/embed", self.endpoint))
            .json(&request);
        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RagBenchError::Embedding(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(RagBenchError::Embedding(format!(
                "Inference service error {}: {}",
                status, body
            )));
        }

        let result: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagBenchError::Embedding(format!("Failed to parse response: {}", e)))?;

        if result.embeddings.len() != texts.len() {
            return Err(RagBenchError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                result.embeddings.len()
            )));
        }

        Ok(result.embeddings)
    }
}

impl Embedder for HttpEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let embeddings = self.embed_request(batch).await?;
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let input = vec![text.to_string()];
        let mut embeddings = self.embed_request(&input).await?;
        embeddings
            .pop()
            .ok_or_else(|| RagBenchError::Embedding("Empty response from inference service".to_string()))
    }
}
