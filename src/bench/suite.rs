use super::dataset::{load_dataset, load_document};
use super::runner::{run_track, TrackOutcome};
use super::RetrievalConfig;
use crate::cache::ModelRegistry;
use crate::config::Config;
use crate::error::Result;
use crate::store::{RunRecord, RunStore};

/// Execute one benchmark run over every configured track, persist the
/// assembled record, and return the stored id along with it.
///
/// Tracks run sequentially in configured order. A track's embedding-model
/// override takes precedence over the requested model for that track only;
/// the reranker (when requested) is shared by all tracks. Any resource or
/// inference failure aborts the whole run and nothing is persisted.
pub async fn execute_run<S: RunStore + ?Sized>(
    config: &Config,
    retrieval: &RetrievalConfig,
    models: &ModelRegistry,
    store: &S,
) -> Result<(String, RunRecord)> {
    let reranker = match retrieval.reranker_model.as_deref() {
        Some(model) => Some(models.reranker(model)?),
        None => None,
    };

    let mut outcomes: Vec<(String, TrackOutcome)> = Vec::with_capacity(config.tracks.len());
    for track in &config.tracks {
        let model = track
            .embedding_model
            .as_deref()
            .unwrap_or(&retrieval.embedding_model);
        let embedder = models.embedder(model)?;

        log::info!(
            "Running benchmark track '{}' (embedding model '{}', reranker {})",
            track.name,
            model,
            retrieval.reranker_model.as_deref().unwrap_or("none")
        );

        let document = load_document(&track.document)?;
        let items = load_dataset(&track.dataset)?;

        let outcome = run_track(
            embedder.as_ref(),
            reranker.as_deref(),
            &document,
            &items,
            retrieval,
        )
        .await?;

        log::info!(
            "Track '{}': {} queries processed, avg F1 {:.4}",
            track.name,
            outcome.per_query.len(),
            outcome.avg_f1
        );
        outcomes.push((track.name.clone(), outcome));
    }

    let record = RunRecord::from_tracks(&outcomes);
    let id = store.save(&record)?;
    Ok((id, record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::testing::{FakeEmbedder, FakeScorer};
    use crate::bench::{BenchmarkItem, ChunkingPolicy};
    use crate::store::{leaderboard, MemoryRunStore};

    fn items(json: &str) -> Vec<BenchmarkItem> {
        serde_json::from_str(json).unwrap()
    }

    fn retrieval_config() -> RetrievalConfig {
        RetrievalConfig {
            chunking: ChunkingPolicy {
                strategy: "naive".to_string(),
                chunk_size: 20,
                overlap: 5,
            },
            embedding_model: "fake".to_string(),
            embedding_top_k: 2,
            reranker_model: None,
            rerank_top_k: 2,
        }
    }

    /// Full pipeline round trip: run two tracks, assemble the record, persist
    /// it, and read it back through the leaderboard.
    #[tokio::test]
    async fn test_run_persist_leaderboard_round_trip() {
        let embedder = FakeEmbedder::new(&[], vec![1.0, 0.0]);
        let config = retrieval_config();

        let english = run_track(
            &embedder,
            None::<&FakeScorer>,
            "The quick brown fox jumps over the lazy dog",
            &items(r#"[{"query": "fox", "labels": [{"snippet": "quick brown fox"}]}]"#),
            &config,
        )
        .await
        .unwrap();
        let telugu = run_track(
            &embedder,
            None::<&FakeScorer>,
            "alpha beta gamma delta epsilon zeta",
            &items(r#"[{"query": "letters", "labels": [{"snippet": "alpha beta"}]}]"#),
            &config,
        )
        .await
        .unwrap();

        let record = RunRecord::from_tracks(&[
            ("english".to_string(), english),
            ("telugu".to_string(), telugu),
        ]);
        let store = MemoryRunStore::new();
        let id = store.save(&record).unwrap();

        let entries = leaderboard(&store).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].f1, record.summary.overall_avg_f1);
        assert_eq!(entries[0].precision, record.summary.overall_avg_precision);
        assert_eq!(entries[0].recall, record.summary.overall_avg_recall);
        assert_eq!(entries[0].similarity, record.summary.overall_avg_similarity);
        assert_eq!(entries[0].total_time, record.summary.total_time);
        assert_eq!(record.tracks.len(), 2);
    }
}
