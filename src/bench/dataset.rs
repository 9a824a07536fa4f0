use crate::error::{RagBenchError, Result};
use serde::Deserialize;
use std::path::Path;

/// One labeled ground-truth snippet for a benchmark query.
#[derive(Debug, Clone, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub snippet: String,
}

/// One benchmark item: a query and its labeled snippets.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkItem {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl BenchmarkItem {
    /// The primary ground-truth snippet. Items may carry several candidate
    /// labels; only the first is used for scoring.
    pub fn primary_snippet(&self) -> Option<&str> {
        self.labels.first().map(|l| l.snippet.as_str())
    }

    /// Items without a query or a primary snippet are skipped, not failed.
    pub fn is_scoreable(&self) -> bool {
        !self.query.is_empty() && self.primary_snippet().is_some_and(|s| !s.is_empty())
    }
}

/// Read a benchmark document as trimmed UTF-8 text.
pub fn load_document(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        RagBenchError::Resource(format!("Failed to read document {}: {}", path.display(), e))
    })?;
    Ok(text.trim().to_string())
}

/// Read a benchmark dataset: a JSON array of items.
pub fn load_dataset(path: &Path) -> Result<Vec<BenchmarkItem>> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        RagBenchError::Resource(format!("Failed to read dataset {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        RagBenchError::Resource(format!("Invalid dataset {}: {}", path.display(), e))
    })
}
