use super::record::RunRecord;
use super::RunStore;
use crate::error::{RagBenchError, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Filesystem store: one pretty-printed JSON file per run under `dir`.
pub struct FsRunStore {
    dir: PathBuf,
}

impl FsRunStore {
    /// Open the store, creating the directory if needed.
    pub fn new(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }
}

impl RunStore for FsRunStore {
    /// Known limitation: ids have second resolution, so two runs saved within
    /// the same second collide and the later write wins. Runs are
    /// human-triggered, so this is not deduplicated.
    fn save(&self, record: &RunRecord) -> Result<String> {
        let id = format!("run_{}", Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.dir.join(format!("{}.json", id));

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| RagBenchError::Persistence(format!("Failed to serialize run: {}", e)))?;
        std::fs::write(&path, json)?;

        log::info!("Saved run {}", path.display());
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<(String, RunRecord)>> {
        let mut runs = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
                continue;
            };

            let raw = match std::fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Error reading run {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<RunRecord>(&raw) {
                Ok(record) => runs.push((id, record)),
                Err(e) => log::warn!("Error parsing run {}: {}", path.display(), e),
            }
        }

        Ok(runs)
    }
}
