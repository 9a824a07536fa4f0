use super::retrieval::Candidate;
use crate::error::{RagBenchError, Result};
use crate::rerank::RerankScorer;

/// Re-score candidates with the pairwise relevance model and keep the top `top_k`.
///
/// Without a scorer this is the identity truncation: the first `top_k`
/// candidates pass through unchanged, scores included (they are already
/// similarity-ordered). With a scorer, every (query, candidate) pair is scored
/// in one order-preserving call, candidates are re-sorted by relevance
/// descending (stable), and truncated to `top_k`.
pub async fn rerank<R: RerankScorer>(
    scorer: Option<&R>,
    query: &str,
    candidates: Vec<Candidate>,
    top_k: usize,
) -> Result<Vec<Candidate>> {
    let Some(scorer) = scorer else {
        let mut passthrough = candidates;
        passthrough.truncate(top_k);
        return Ok(passthrough);
    };

    if candidates.is_empty() {
        return Ok(candidates);
    }

    let texts: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
    let scores = scorer.score_pairs(query, &texts).await?;
    if scores.len() != candidates.len() {
        return Err(RagBenchError::Rerank(format!(
            "Expected {} relevance scores, got {}",
            candidates.len(),
            scores.len()
        )));
    }

    let mut rescored: Vec<Candidate> = candidates
        .into_iter()
        .zip(scores)
        .map(|(candidate, score)| Candidate {
            text: candidate.text,
            score,
        })
        .collect();
    rescored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    rescored.truncate(top_k);
    Ok(rescored)
}
