use crate::bench::runner::TrackOutcome;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Convert a 0–1 fraction to a percentage with 2 decimal places.
pub fn to_percent(value: f64) -> f64 {
    (value * 10_000.0).round() / 100.0
}

/// Round a duration in seconds to 3 decimal places.
pub fn round_secs(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}

/// Overall summary block of a run. Metric fields are percent-scaled (0–100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub overall_avg_recall: f64,
    pub overall_avg_precision: f64,
    pub overall_avg_f1: f64,
    pub overall_avg_similarity: f64,
    /// Sum of the per-track mean latencies, in seconds.
    pub total_time: f64,
}

/// Per-track summary block. Metric fields are percent-scaled (0–100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackSummary {
    pub avg_recall: f64,
    pub avg_precision: f64,
    pub avg_f1: f64,
    pub avg_similarity: f64,
    /// Mean per-query latency in seconds.
    pub avg_latency: f64,
}

/// One query's percent-scaled breakdown inside a persisted run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerQueryRecord {
    pub query: String,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
    pub similarity: f64,
}

/// One track's block inside a persisted run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackRecord {
    pub summary: TrackSummary,
    pub per_query: Vec<PerQueryRecord>,
}

/// Immutable record of one completed run, exactly as persisted: an overall
/// summary plus one block per track, keyed by track name at the top level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunRecord {
    pub summary: RunSummary,
    #[serde(flatten)]
    pub tracks: BTreeMap<String, TrackRecord>,
}

impl RunRecord {
    /// Assemble the persisted record from per-track outcomes.
    ///
    /// Overall metrics are the equal-weight mean of the per-track averages
    /// (not query-weighted); total time is the sum of the per-track mean
    /// latencies. All fractions are percent-scaled here, once, on the way out.
    pub fn from_tracks(outcomes: &[(String, TrackOutcome)]) -> Self {
        let mean_of = |metric: fn(&TrackOutcome) -> f64| -> f64 {
            if outcomes.is_empty() {
                0.0
            } else {
                outcomes.iter().map(|(_, o)| metric(o)).sum::<f64>() / outcomes.len() as f64
            }
        };

        let summary = RunSummary {
            overall_avg_recall: to_percent(mean_of(|o| o.avg_recall)),
            overall_avg_precision: to_percent(mean_of(|o| o.avg_precision)),
            overall_avg_f1: to_percent(mean_of(|o| o.avg_f1)),
            overall_avg_similarity: to_percent(mean_of(|o| o.avg_similarity)),
            total_time: round_secs(outcomes.iter().map(|(_, o)| o.avg_latency).sum()),
        };

        let tracks = outcomes
            .iter()
            .map(|(name, outcome)| {
                let track = TrackRecord {
                    summary: TrackSummary {
                        avg_recall: to_percent(outcome.avg_recall),
                        avg_precision: to_percent(outcome.avg_precision),
                        avg_f1: to_percent(outcome.avg_f1),
                        avg_similarity: to_percent(outcome.avg_similarity),
                        avg_latency: round_secs(outcome.avg_latency),
                    },
                    per_query: outcome
                        .per_query
                        .iter()
                        .map(|q| PerQueryRecord {
                            query: q.query.clone(),
                            recall: to_percent(q.recall),
                            precision: to_percent(q.precision),
                            f1: to_percent(q.f1),
                            similarity: to_percent(q.similarity),
                        })
                        .collect(),
                };
                (name.clone(), track)
            })
            .collect();

        Self { summary, tracks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::runner::QueryResult;

    fn outcome(recall: f64, latency: f64) -> TrackOutcome {
        TrackOutcome::from_results(vec![QueryResult {
            query: "q".to_string(),
            recall,
            precision: recall / 2.0,
            f1: recall / 3.0,
            similarity: 0.5,
            latency_secs: latency,
        }])
    }

    #[test]
    fn test_to_percent_rounds_to_two_decimals() {
        assert_eq!(to_percent(0.857142857), 85.71);
        assert_eq!(to_percent(6.0 / 7.0), 85.71);
        assert_eq!(to_percent(1.0), 100.0);
        assert_eq!(to_percent(0.0), 0.0);
        assert_eq!(to_percent(0.123456), 12.35);
    }

    #[test]
    fn test_round_secs_three_decimals() {
        assert_eq!(round_secs(1.23456), 1.235);
        assert_eq!(round_secs(0.0004), 0.0);
    }

    #[test]
    fn test_from_tracks_percent_scales_and_averages() {
        let outcomes = vec![
            ("english".to_string(), outcome(1.0, 0.25)),
            ("telugu".to_string(), outcome(0.5, 0.75)),
        ];
        let record = RunRecord::from_tracks(&outcomes);

        // Overall = equal-weight mean of track averages, percent-scaled
        assert_eq!(record.summary.overall_avg_recall, 75.0);
        assert_eq!(record.summary.total_time, 1.0);

        assert_eq!(record.tracks["english"].summary.avg_recall, 100.0);
        assert_eq!(record.tracks["telugu"].summary.avg_recall, 50.0);
        assert_eq!(record.tracks["english"].per_query[0].similarity, 50.0);
    }

    #[test]
    fn test_from_tracks_empty_is_all_zero() {
        let record = RunRecord::from_tracks(&[]);
        assert_eq!(record.summary.overall_avg_f1, 0.0);
        assert_eq!(record.summary.total_time, 0.0);
        assert!(record.tracks.is_empty());
    }

    #[test]
    fn test_record_json_shape_keys_tracks_at_top_level() {
        let outcomes = vec![("english".to_string(), outcome(1.0, 0.1))];
        let record = RunRecord::from_tracks(&outcomes);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("summary").is_some());
        assert!(json.get("english").is_some());
        assert!(json["english"].get("per_query").is_some());

        let parsed: RunRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
