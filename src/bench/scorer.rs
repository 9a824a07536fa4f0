use std::collections::HashSet;

/// Token-overlap metrics between retrieved text and a ground-truth snippet.
/// All three values are fractions in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlapMetrics {
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
}

/// Score retrieved texts against the expected snippet.
///
/// Retrieved texts are space-joined in retrieval order; both sides are
/// lowercased and tokenized on whitespace. The metric is set-based: duplicate
/// tokens do not inflate the score. `recall = |R∩T| / |T|`,
/// `precision = |R∩T| / |R|`, `f1` is their harmonic mean. When either side
/// tokenizes to an empty set, all three metrics are 0 (defined, not an error).
pub fn evaluate(retrieved: &[String], expected_snippet: &str) -> OverlapMetrics {
    let retrieved_text = retrieved.join(" ").to_lowercase();
    let expected_text = expected_snippet.to_lowercase();

    let r_tokens: HashSet<&str> = retrieved_text.split_whitespace().collect();
    let t_tokens: HashSet<&str> = expected_text.split_whitespace().collect();

    if r_tokens.is_empty() || t_tokens.is_empty() {
        return OverlapMetrics::default();
    }

    let overlap = r_tokens.intersection(&t_tokens).count() as f64;
    let recall = overlap / t_tokens.len() as f64;
    let precision = overlap / r_tokens.len() as f64;
    let f1 = if recall + precision > 0.0 {
        2.0 * recall * precision / (recall + precision)
    } else {
        0.0
    };

    OverlapMetrics {
        recall,
        precision,
        f1,
    }
}
