//! Benchmark evaluation pipeline: chunking, top-k retrieval, optional
//! reranking, lexical-overlap scoring, per-track runs, and multi-track
//! suite execution.

pub mod chunker;
pub mod dataset;
pub mod reranking;
pub mod retrieval;
pub mod runner;
pub mod scorer;
pub mod suite;

pub use chunker::{split_document, ChunkingPolicy};
pub use dataset::{load_dataset, load_document, BenchmarkItem};
pub use retrieval::{retrieve, Candidate};
pub use runner::{run_track, QueryResult, TrackOutcome};
pub use scorer::{evaluate, OverlapMetrics};

use crate::error::{RagBenchError, Result};

/// One fully-resolved pipeline configuration for a benchmark run.
///
/// Validated once at the request boundary; the pipeline itself assumes the
/// invariants hold and never re-checks them.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub chunking: ChunkingPolicy,
    pub embedding_model: String,
    pub embedding_top_k: usize,
    /// No reranker model means the rerank stage is an identity truncation.
    pub reranker_model: Option<String>,
    pub rerank_top_k: usize,
}

impl RetrievalConfig {
    /// Fail fast on invalid parameters, before any model or I/O work.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;

        if self.embedding_top_k == 0 || self.rerank_top_k == 0 {
            return Err(RagBenchError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.embedding_model.trim().is_empty() {
            return Err(RagBenchError::Config(
                "embedding_model must not be empty".to_string(),
            ));
        }

        if let Some(ref model) = self.reranker_model {
            if model.trim().is_empty() {
                return Err(RagBenchError::Config(
                    "reranker_model must not be empty; omit it to disable reranking".to_string(),
                ));
            }
        }

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RetrievalConfig {
        RetrievalConfig {
            chunking: ChunkingPolicy {
                strategy: "naive".to_string(),
                chunk_size: 500,
                overlap: 50,
            },
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_top_k: 5,
            reranker_model: None,
            rerank_top_k: 5,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = valid_config();
        config.embedding_top_k = 0;
        assert!(matches!(
            config.validate(),
            Err(RagBenchError::Config(_))
        ));
    }

    #[test]
    fn test_empty_embedding_model_rejected() {
        let mut config = valid_config();
        config.embedding_model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_reranker_model_rejected() {
        let mut config = valid_config();
        config.reranker_model = Some(String::new());
        assert!(config.validate().is_err());
    }
}
