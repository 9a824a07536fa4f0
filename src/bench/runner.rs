use super::chunker::split_document;
use super::dataset::BenchmarkItem;
use super::reranking::rerank;
use super::retrieval::retrieve;
use super::scorer::evaluate;
use super::RetrievalConfig;
use crate::embeddings::Embedder;
use crate::error::Result;
use crate::rerank::RerankScorer;
use std::time::Instant;

/// Metrics for one benchmark query.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub query: String,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
    /// Mean of the post-rerank candidate scores; 0.0 when nothing was retrieved.
    pub similarity: f64,
    /// Wall-clock seconds spent in retrieval + reranking for this query.
    pub latency_secs: f64,
}

/// Aggregate outcome of one track: arithmetic means over all processed
/// queries, plus the ordered per-query results themselves.
#[derive(Debug, Clone, Default)]
pub struct TrackOutcome {
    pub avg_recall: f64,
    pub avg_precision: f64,
    pub avg_f1: f64,
    pub avg_similarity: f64,
    pub avg_latency: f64,
    pub per_query: Vec<QueryResult>,
}

impl TrackOutcome {
    /// Means over the processed queries; all zeros when none were processed.
    pub fn from_results(per_query: Vec<QueryResult>) -> Self {
        if per_query.is_empty() {
            return Self::default();
        }

        let n = per_query.len() as f64;
        Self {
            avg_recall: per_query.iter().map(|q| q.recall).sum::<f64>() / n,
            avg_precision: per_query.iter().map(|q| q.precision).sum::<f64>() / n,
            avg_f1: per_query.iter().map(|q| q.f1).sum::<f64>() / n,
            avg_similarity: per_query.iter().map(|q| q.similarity).sum::<f64>() / n,
            avg_latency: per_query.iter().map(|q| q.latency_secs).sum::<f64>() / n,
            per_query,
        }
    }
}

/// Run one pipeline configuration over one track's document and items.
///
/// The document is chunked exactly once; every query shares the chunk list.
/// Queries execute strictly sequentially. Items without a query or a primary
/// snippet are skipped and excluded from every aggregate.
pub async fn run_track<E: Embedder, R: RerankScorer>(
    embedder: &E,
    reranker: Option<&R>,
    document_text: &str,
    items: &[BenchmarkItem],
    config: &RetrievalConfig,
) -> Result<TrackOutcome> {
    let chunks = split_document(document_text, &config.chunking);
    log::debug!(
        "Chunked document into {} chunks (chunk_size={}, overlap={})",
        chunks.len(),
        config.chunking.chunk_size,
        config.chunking.overlap
    );

    let mut per_query = Vec::new();
    for item in items {
        if !item.is_scoreable() {
            log::debug!("Skipping benchmark item without query or snippet");
            continue;
        }
        let snippet = item.primary_snippet().unwrap_or("");

        let start = Instant::now();
        let retrieved = retrieve(embedder, &item.query, &chunks, config.embedding_top_k).await?;
        let reranked = rerank(reranker, &item.query, retrieved, config.rerank_top_k).await?;
        let latency_secs = start.elapsed().as_secs_f64();

        let similarity = if reranked.is_empty() {
            0.0
        } else {
            reranked.iter().map(|c| c.score as f64).sum::<f64>() / reranked.len() as f64
        };

        let texts: Vec<String> = reranked.into_iter().map(|c| c.text).collect();
        let metrics = evaluate(&texts, snippet);

        per_query.push(QueryResult {
            query: item.query.clone(),
            recall: metrics.recall,
            precision: metrics.precision,
            f1: metrics.f1,
            similarity,
            latency_secs,
        });
    }

    Ok(TrackOutcome::from_results(per_query))
}
