pub mod model_cache;

pub use model_cache::ModelCache;

use crate::config::InferenceConfig;
use crate::embeddings::HttpEmbedder;
use crate::error::Result;
use crate::rerank::HttpReranker;
use std::sync::Arc;

/// Process-wide registry of model clients.
///
/// Holds one bounded LRU cache per model kind so repeated runs with the same
/// model ids reuse constructed clients. Built once at startup and passed by
/// reference to whatever needs model access.
pub struct ModelRegistry {
    inference: InferenceConfig,
    api_key: Option<String>,
    embedders: ModelCache<HttpEmbedder>,
    rerankers: ModelCache<HttpReranker>,
}

impl ModelRegistry {
    /// Create a registry from the inference settings.
    ///
    /// The bearer token, if configured, is read from the environment once here.
    pub fn new(inference: InferenceConfig) -> Self {
        let api_key = inference
            .api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok());

        Self {
            embedders: ModelCache::new(inference.embedding_cache_slots),
            rerankers: ModelCache::new(inference.reranker_cache_slots),
            api_key,
            inference,
        }
    }

    /// Resolve an embedding model id to a cached client.
    pub fn embedder(&self, model: &str) -> Result<Arc<HttpEmbedder>> {
        self.embedders.get_or_load(model, |id| {
            log::info!("Loading embedding model client: {}", id);
            HttpEmbedder::new(
                &self.inference.endpoint,
                self.api_key.clone(),
                id,
                self.inference.batch_size,
                self.inference.timeout_secs,
            )
        })
    }

    /// Resolve a reranker model id to a cached client.
    pub fn reranker(&self, model: &str) -> Result<Arc<HttpReranker>> {
        self.rerankers.get_or_load(model, |id| {
            log::info!("Loading reranker model client: {}", id);
            HttpReranker::new(
                &self.inference.endpoint,
                self.api_key.clone(),
                id,
                self.inference.timeout_secs,
            )
        })
    }
}
