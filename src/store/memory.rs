use super::record::RunRecord;
use super::RunStore;
use crate::error::Result;
use std::sync::Mutex;

/// In-memory store with sequential ids. Mirrors [`super::FsRunStore`]
/// semantics for tests and embedded use; nothing is written to disk.
#[derive(Default)]
pub struct MemoryRunStore {
    runs: Mutex<Vec<(String, RunRecord)>>,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RunStore for MemoryRunStore {
    fn save(&self, record: &RunRecord) -> Result<String> {
        let mut runs = self.runs.lock().unwrap();
        let id = format!("run_{:06}", runs.len() + 1);
        runs.push((id.clone(), record.clone()));
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<(String, RunRecord)>> {
        Ok(self.runs.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::record_with_f1;
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let store = MemoryRunStore::new();
        assert_eq!(store.save(&record_with_f1(10.0)).unwrap(), "run_000001");
        assert_eq!(store.save(&record_with_f1(20.0)).unwrap(), "run_000002");
        assert_eq!(store.list_all().unwrap().len(), 2);
    }
}
