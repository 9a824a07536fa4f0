//! Durable run storage and the leaderboard projection built from it.

pub mod fs;
pub mod memory;
pub mod record;

pub use fs::FsRunStore;
pub use memory::MemoryRunStore;
pub use record::RunRecord;

use crate::error::Result;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Durable storage for completed runs.
///
/// Records are immutable: implementations only ever add and read, never
/// update or delete. Injected so the pipeline tests run against
/// [`MemoryRunStore`] without touching a filesystem.
pub trait RunStore: Send + Sync {
    /// Persist a completed run; returns the generated run id.
    fn save(&self, record: &RunRecord) -> Result<String>;

    /// All readable (id, record) pairs, in no particular order.
    /// Malformed stored records are skipped with a logged warning.
    fn list_all(&self) -> Result<Vec<(String, RunRecord)>>;
}

/// One leaderboard row, projected from a stored run on read (never stored).
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub similarity: f64,
    pub total_time: f64,
    /// Derived from the run id; `None` for ids that do not follow the
    /// `run_YYYYMMDD_HHMMSS` pattern.
    pub created_at: Option<NaiveDateTime>,
}

/// Parse the creation timestamp embedded in a run id such as
/// `run_20250806_141530`.
pub fn created_at_from_id(id: &str) -> Option<NaiveDateTime> {
    let stamp = id.strip_prefix("run_")?;
    NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S").ok()
}

/// Rank every stored run by overall F1, best first.
/// Ties carry no guaranteed secondary order.
pub fn leaderboard<S: RunStore + ?Sized>(store: &S) -> Result<Vec<LeaderboardEntry>> {
    let mut entries: Vec<LeaderboardEntry> = store
        .list_all()?
        .into_iter()
        .map(|(id, record)| LeaderboardEntry {
            created_at: created_at_from_id(&id),
            f1: record.summary.overall_avg_f1,
            precision: record.summary.overall_avg_precision,
            recall: record.summary.overall_avg_recall,
            similarity: record.summary.overall_avg_similarity,
            total_time: record.summary.total_time,
            id,
        })
        .collect();

    entries.sort_by(|a, b| b.f1.partial_cmp(&a.f1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::record::{RunSummary, TrackRecord};
    use super::*;
    use std::collections::BTreeMap;

    pub(crate) fn record_with_f1(f1: f64) -> RunRecord {
        RunRecord {
            summary: RunSummary {
                overall_avg_recall: 90.0,
                overall_avg_precision: 80.0,
                overall_avg_f1: f1,
                overall_avg_similarity: 70.0,
                total_time: 1.5,
            },
            tracks: BTreeMap::<String, TrackRecord>::new(),
        }
    }

    #[test]
    fn test_created_at_from_id() {
        let parsed = created_at_from_id("run_20250806_141530").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-08-06 14:15:30");
    }

    #[test]
    fn test_created_at_from_bad_id() {
        assert!(created_at_from_id("not-a-run-id").is_none());
        assert!(created_at_from_id("run_2025").is_none());
    }

    #[test]
    fn test_leaderboard_sorted_by_f1_descending() {
        let store = MemoryRunStore::new();
        store.save(&record_with_f1(40.0)).unwrap();
        store.save(&record_with_f1(90.0)).unwrap();
        store.save(&record_with_f1(65.0)).unwrap();

        let entries = leaderboard(&store).unwrap();
        let f1s: Vec<f64> = entries.iter().map(|e| e.f1).collect();
        assert_eq!(f1s, vec![90.0, 65.0, 40.0]);
    }

    #[test]
    fn test_leaderboard_projects_summary_fields() {
        let store = MemoryRunStore::new();
        let id = store.save(&record_with_f1(55.0)).unwrap();

        let entries = leaderboard(&store).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, id);
        assert_eq!(entries[0].recall, 90.0);
        assert_eq!(entries[0].precision, 80.0);
        assert_eq!(entries[0].similarity, 70.0);
        assert_eq!(entries[0].total_time, 1.5);
    }
}
