use crate::embeddings::Embedder;
use crate::error::{RagBenchError, Result};

/// A retrieved chunk with its score.
///
/// Before reranking the score is a cosine similarity; after reranking it is a
/// cross-encoder relevance value. The two scales are never compared.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub score: f32,
}

/// Retrieve the `top_k` chunks most similar to `query`.
///
/// One batched embedding call covers all chunks, one more embeds the query.
/// Results are sorted by similarity descending; ties keep the original chunk
/// order (stable sort). Returns at most `min(top_k, chunks.len())`
/// candidates; an empty chunk list yields an empty result, not an error.
pub async fn retrieve<E: Embedder>(
    embedder: &E,
    query: &str,
    chunks: &[String],
    top_k: usize,
) -> Result<Vec<Candidate>> {
    if chunks.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_vecs = embedder.embed_batch(chunks).await?;
    if chunk_vecs.len() != chunks.len() {
        return Err(RagBenchError::Embedding(format!(
            "Expected {} chunk embeddings, got {}",
            chunks.len(),
            chunk_vecs.len()
        )));
    }
    let query_vec = embedder.embed_one(query).await?;

    let mut candidates = Vec::with_capacity(chunks.len());
    for (chunk, vec) in chunks.iter().zip(chunk_vecs.iter()) {
        if vec.len() != query_vec.len() {
            return Err(RagBenchError::Embedding(format!(
                "Embedding dimension mismatch: query has {}, chunk has {}",
                query_vec.len(),
                vec.len()
            )));
        }
        candidates.push(Candidate {
            text: chunk.clone(),
            score: cosine_similarity(&query_vec, vec),
        });
    }

    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(top_k);
    Ok(candidates)
}

/// Compute cosine similarity between two equal-length vectors.
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();

    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::testing::FakeEmbedder;

    fn chunks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(similarity.abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_magnitude_independent() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]);
        assert!((similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_magnitude() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_retrieve_orders_by_similarity() {
        let embedder = FakeEmbedder::new(
            &[
                ("q", vec![1.0, 0.0]),
                ("far", vec![0.0, 1.0]),
                ("near", vec![0.9, 0.1]),
                ("middle", vec![0.5, 0.5]),
            ],
            vec![0.0, 0.0],
        );

        let results = retrieve(&embedder, "q", &chunks(&["far", "near", "middle"]), 3)
            .await
            .unwrap();

        let texts: Vec<&str> = results.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["near", "middle", "far"]);
        assert!(results[0].score > results[1].score);
        assert!(results[1].score > results[2].score);
    }

    #[tokio::test]
    async fn test_retrieve_truncates_to_top_k() {
        let embedder = FakeEmbedder::new(&[("q", vec![1.0, 0.0])], vec![0.5, 0.5]);
        let results = retrieve(&embedder, "q", &chunks(&["a", "b", "c", "d"]), 2)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_retrieve_returns_all_when_top_k_exceeds_chunks() {
        let embedder = FakeEmbedder::new(&[("q", vec![1.0, 0.0])], vec![0.5, 0.5]);
        let results = retrieve(&embedder, "q", &chunks(&["a", "b", "c"]), 5)
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_retrieve_ties_keep_chunk_order() {
        // All chunks share the default vector: every similarity ties.
        let embedder = FakeEmbedder::new(&[("q", vec![1.0, 1.0])], vec![1.0, 1.0]);
        let results = retrieve(&embedder, "q", &chunks(&["first", "second", "third"]), 3)
            .await
            .unwrap();

        let texts: Vec<&str> = results.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_retrieve_empty_chunks() {
        let embedder = FakeEmbedder::new(&[], vec![1.0]);
        let results = retrieve(&embedder, "q", &[], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_dimension_mismatch_is_error() {
        let embedder = FakeEmbedder::new(&[("q", vec![1.0, 0.0, 0.0])], vec![1.0, 0.0]);
        let err = retrieve(&embedder, "q", &chunks(&["a"]), 1).await.unwrap_err();
        assert!(matches!(err, RagBenchError::Embedding(_)));
    }
}
