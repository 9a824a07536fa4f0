//! Reranking capability: pairwise (query, candidate) relevance scoring behind
//! a trait, HTTP-backed in production.

pub mod http;

pub use http::HttpReranker;

use crate::error::Result;
use std::future::Future;

/// Pairwise relevance scoring capability (cross-encoder style).
pub trait RerankScorer: Send + Sync {
    /// Score every (query, candidate) pair. Order-preserving: one score per
    /// candidate, higher = more relevant. Relevance scores live on a different
    /// scale than embedding similarities and must not be mixed with them.
    fn score_pairs(
        &self,
        query: &str,
        candidates: &[String],
    ) -> impl Future<Output = Result<Vec<f32>>> + Send;
}
